//! Rendering: JSON documents, tables, colors and amount formatting.

use std::io::IsTerminal;

use api::http::{EventDto, HealthCheckDto, PaymentStatus};
use comfy_table::{presets, Cell, CellAlignment, Table};
use numeric::Int;
use owo_colors::OwoColorize;
use serde::Serialize;
use supports_color::Stream;

use crate::cli::{ColorOpt, OutputOpt};
use crate::error::CliResult;

/// Resolved output mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    pub fn resolve(opt: OutputOpt) -> Self {
        match opt {
            OutputOpt::Text => OutputMode::Text,
            OutputOpt::Json => OutputMode::Json,
            OutputOpt::Auto if std::io::stdout().is_terminal() => OutputMode::Text,
            OutputOpt::Auto => OutputMode::Json,
        }
    }
}

/// Whether to color stdout. `NO_COLOR` only affects `auto`.
pub fn color_enabled(opt: ColorOpt, is_tty: bool, supported: bool, no_color: bool) -> bool {
    match opt {
        ColorOpt::Always => true,
        ColorOpt::Never => false,
        ColorOpt::Auto => is_tty && supported && !no_color,
    }
}

/// Writes results to stdout in the selected mode.
#[derive(Clone, Copy, Debug)]
pub struct Printer {
    pub mode: OutputMode,
    pub pretty: bool,
    pub no_truncate: bool,
    pub unicode: bool,
    pub color: bool,
}

impl Printer {
    pub fn new(mode: OutputMode, pretty: bool, no_truncate: bool, color: ColorOpt) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let color = color_enabled(
            color,
            is_tty,
            supports_color::on(Stream::Stdout).is_some(),
            std::env::var_os("NO_COLOR").is_some(),
        );
        Self { mode, pretty, no_truncate, unicode: is_tty, color }
    }

    pub fn is_json(&self) -> bool { self.mode == OutputMode::Json }

    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> CliResult<()> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{text}");
        Ok(())
    }

    /// JSON in JSON mode, otherwise whatever `text` prints.
    pub fn emit<T: Serialize + ?Sized>(&self, value: &T, text: impl FnOnce(&T)) -> CliResult<()> {
        match self.mode {
            OutputMode::Json => self.json(value),
            OutputMode::Text => {
                text(value);
                Ok(())
            }
        }
    }

    pub fn id(&self, id: &str) -> String {
        if self.no_truncate {
            id.to_string()
        } else {
            truncate_id(id)
        }
    }

    pub fn table(&self, headers: &[&str], rows: Vec<Vec<String>>) {
        println!("{}", build_table(self.unicode, headers, rows, &[]));
    }

    pub fn table_right(&self, headers: &[&str], rows: Vec<Vec<String>>, right: &[usize]) {
        println!("{}", build_table(self.unicode, headers, rows, right));
    }

    pub fn fields(&self, rows: Vec<(&str, String)>) {
        let rows = rows.into_iter().map(|(k, v)| vec![k.to_string(), v]).collect::<Vec<_>>();
        self.table(&["Field", "Value"], rows);
    }

    fn marks(&self) -> (&'static str, &'static str) {
        if self.unicode {
            ("✔", "✘")
        } else {
            ("[OK]", "[X]")
        }
    }

    /// Green for good, red for bad, plain without color.
    fn paint(&self, text: &str, good: bool) -> String {
        match (self.color, good) {
            (false, _) => text.to_string(),
            (true, true) => text.green().to_string(),
            (true, false) => text.red().to_string(),
        }
    }

    /// Status cell: mark plus name, colored by outcome.
    pub fn status(&self, status: PaymentStatus) -> String {
        let (good, bad) = self.marks();
        let text = match status {
            PaymentStatus::Succeeded => format!("{good} {status}"),
            PaymentStatus::Failed => format!("{bad} {status}"),
            PaymentStatus::Pending => {
                let dots = if self.unicode { "…" } else { "..." };
                let text = format!("{dots} {status}");
                return if self.color { text.yellow().to_string() } else { text };
            }
        };
        self.paint(&text, status == PaymentStatus::Succeeded)
    }

    pub fn checks(&self, title: &str, ok: bool, checks: &[HealthCheckDto]) {
        let (good, bad) = self.marks();
        let mark = |ok: bool| self.paint(if ok { good } else { bad }, ok);
        println!("{} {title}", mark(ok));
        for c in checks {
            let name = check_label(&c.name);
            match c.detail.as_deref() {
                Some(detail) if !detail.is_empty() => {
                    println!("  {} {name}: {detail}", mark(c.ok))
                }
                _ => println!("  {} {name}", mark(c.ok)),
            }
            if let Some(hint) = &c.hint {
                println!("      hint: {hint}");
            }
        }
    }
}

/// Bordered table; columns listed in `right` are right-aligned.
pub fn build_table(
    unicode: bool,
    headers: &[&str],
    rows: Vec<Vec<String>>,
    right: &[usize],
) -> Table {
    let mut table = Table::new();
    table
        .load_preset(if unicode { presets::UTF8_FULL } else { presets::ASCII_FULL })
        .set_header(headers.iter().map(|h| Cell::new(*h)));

    for row in rows {
        table.add_row(row.into_iter().enumerate().map(|(i, v)| {
            let cell = Cell::new(v);
            if right.contains(&i) {
                cell.set_alignment(CellAlignment::Right)
            } else {
                cell
            }
        }));
    }
    table
}

/// `0123456789abcdef...` ids shortened to head and tail.
pub fn truncate_id(s: &str) -> String {
    const HEAD: usize = 8;
    const TAIL: usize = 8;
    if s.len() <= HEAD + TAIL + 3 || !s.is_ascii() {
        return s.to_string();
    }
    format!("{}...{}", &s[..HEAD], &s[s.len() - TAIL..])
}

/// Inserts thousands separators into a decimal string.
pub fn group_digits(decimal: &str) -> String {
    let (sign, digits) = match decimal.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", decimal),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (n, ch) in digits.chars().rev().enumerate() {
        if n > 0 && n % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{sign}{}", out.chars().rev().collect::<String>())
}

/// `1,234` for an amount, `-` when absent.
pub fn amount(v: Option<&Int>) -> String {
    v.map(|v| group_digits(&v.to_string())).unwrap_or_else(|| "-".into())
}

/// `0.5 BTC` with trailing zeros removed.
pub fn btc_from_sats(sats: u64) -> String {
    let whole = sats / 100_000_000;
    let frac = format!("{:08}", sats % 100_000_000);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        format!("{whole}.0 BTC")
    } else {
        format!("{whole}.{frac} BTC")
    }
}

/// Balance for display: BTC from one coin up, grouped sats below.
pub fn balance(sats: &Int, raw: bool) -> String {
    match sats.to_u64() {
        _ if raw => format!("{sats} sats"),
        Some(v) if v >= 100_000_000 => btc_from_sats(v),
        _ => format!("{} sats", group_digits(&sats.to_string())),
    }
}

/// Signed balance change.
pub fn balance_delta(before: &Int, after: &Int) -> String {
    match (before.to_i128(), after.to_i128()) {
        (Some(b), Some(a)) if a == b => "0 sats".to_string(),
        (Some(b), Some(a)) => {
            let sign = if a > b { "+" } else { "-" };
            let magnitude = Int::from(a.abs_diff(b));
            format!("{sign}{}", balance(&magnitude, false))
        }
        _ => "?".to_string(),
    }
}

fn check_label(name: &str) -> String {
    let mut out = Vec::new();
    for part in name.split('_').filter(|p| !p.is_empty()) {
        out.push(match part {
            "http" | "api" | "p2p" => part.to_ascii_uppercase(),
            _ => {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        });
    }
    if out.is_empty() {
        name.to_string()
    } else {
        out.join(" ")
    }
}

/// One line per event.
pub fn event_line(ev: &EventDto) -> String {
    let opt = |s: &Option<String>| s.clone().unwrap_or_else(|| "-".into());
    match ev {
        EventDto::PaymentSuccessful { payment_id, fee_paid_msat } => format!(
            "PaymentSuccessful payment_id={} fee_paid={} msat",
            opt(payment_id),
            amount(fee_paid_msat.as_ref())
        ),
        EventDto::PaymentFailed { payment_id } => {
            format!("PaymentFailed payment_id={}", opt(payment_id))
        }
        EventDto::PaymentReceived { payment_id, amount_msat } => format!(
            "PaymentReceived payment_id={} amount={} msat",
            opt(payment_id),
            amount(Some(amount_msat))
        ),
        EventDto::ChannelPending { funding_txo } => {
            format!("ChannelPending funding_txo={funding_txo}")
        }
        EventDto::ChannelReady { user_channel_id } => {
            format!("ChannelReady user_channel_id={user_channel_id}")
        }
        EventDto::ChannelClosed { channel_id, user_channel_id, counterparty_node_id, reason } => {
            format!(
                "ChannelClosed user_channel_id={user_channel_id} channel_id={channel_id} counterparty_node_id={} reason={}",
                opt(counterparty_node_id),
                opt(reason)
            )
        }
        EventDto::Other { kind } => format!("Other kind={kind}"),
    }
}
