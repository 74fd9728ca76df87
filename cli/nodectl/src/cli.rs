//! Command-line surface.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// How results are printed.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputOpt {
    /// Text on a terminal, JSON otherwise.
    Auto,
    /// Human-readable tables and lines.
    Text,
    /// One JSON document per result.
    Json,
}

/// When to color text output.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum ColorOpt {
    /// Color on a terminal that supports it, unless NO_COLOR is set.
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

/// Command-line interface configuration for nodectl.
#[derive(Parser, Debug)]
#[command(
    name = "nodectl",
    about = "Talk to a Lightning node over its HTTP control API",
    version,
    subcommand_required = true,
    arg_required_else_help = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Node URL (overrides NODEWIRE_URL, NODEWIRE_CTX and the current context)
    #[arg(long, global = true)]
    pub connect: Option<String>,

    /// Config file (default: the user config dir's nodewire/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output mode
    #[arg(long, value_enum, default_value_t = OutputOpt::Auto, global = true)]
    pub output: OutputOpt,

    /// Color mode for text output
    #[arg(long, value_enum, default_value_t = ColorOpt::Auto, global = true)]
    pub color: ColorOpt,

    /// More log output on stderr (-v info, -vv debug, -vvv trace); NODEWIRE_LOG wins
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Assume yes for confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    /// Do not shorten long ids in tables
    #[arg(long, global = true)]
    pub no_truncate: bool,

    /// Per-request timeout in seconds (0 disables; default from config, else none)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level command groups.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage connection contexts
    Ctx {
        #[command(subcommand)]
        command: CtxCommand,
    },
    /// Node health, readiness and identity
    Node {
        #[command(subcommand)]
        command: NodeCommand,
    },
    /// On-chain wallet
    Wallet {
        #[command(subcommand)]
        command: WalletCommand,
    },
    /// Peers
    Peer {
        #[command(subcommand)]
        command: PeerCommand,
    },
    /// Channels
    Channel {
        #[command(subcommand)]
        command: ChannelCommand,
    },
    /// Payments: BOLT11 invoices, BOLT12 offers and refunds, keysend
    Pay {
        #[command(subcommand)]
        command: PayCommand,
    },
    /// Node event queue
    Events {
        #[command(subcommand)]
        command: EventsCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum CtxCommand {
    /// List contexts
    Ls,
    /// Show the current context
    Show,
    /// Add or update a context
    Add(CtxAddArgs),
    /// Make a context current
    Use { name: String },
    /// Remove a context
    Rm { name: String },
}

#[derive(Args, Debug)]
pub struct CtxAddArgs {
    pub name: String,
    /// Node URL, e.g. http://127.0.0.1:8500
    #[arg(long)]
    pub url: String,
    /// Make it current right away
    #[arg(long)]
    pub use_now: bool,
}

#[derive(Subcommand, Debug)]
pub enum NodeCommand {
    /// Liveness checks
    Health,
    /// Readiness checks (exits 1 when not ready)
    Ready,
    /// Runtime status
    Status,
    /// Node public key
    Id,
    /// Listening addresses
    Listen,
    /// Node software version
    Version,
}

#[derive(Subcommand, Debug)]
pub enum WalletCommand {
    /// Show balances
    Balance {
        /// Always show sats, without BTC conversion or separators
        #[arg(long)]
        sats: bool,
    },
    /// New on-chain address
    Address,
    /// Sync wallets and report balance changes
    Sync,
}

#[derive(Subcommand, Debug)]
pub enum PeerCommand {
    /// List peers
    Ls,
    /// Connect to a peer
    Connect {
        node_id: String,
        addr: String,
        /// Keep the peer across restarts
        #[arg(long)]
        persist: bool,
    },
    /// Disconnect a peer
    Disconnect { node_id: String },
}

#[derive(Subcommand, Debug)]
pub enum ChannelCommand {
    /// List channels
    Ls,
    /// Open a channel
    Open(ChannelOpenArgs),
    /// Cooperatively close a channel
    Close(ChannelCloseArgs),
    /// Force-close a channel (asks for confirmation)
    ForceClose(ChannelCloseArgs),
}

#[derive(Args, Debug)]
pub struct ChannelOpenArgs {
    #[arg(long)]
    pub node_id: String,
    #[arg(long)]
    pub addr: String,
    #[arg(long)]
    pub amount_sats: u64,
    #[arg(long)]
    pub push_msat: Option<u64>,
    /// Do not announce the channel
    #[arg(long)]
    pub private: bool,
}

#[derive(Args, Debug)]
pub struct ChannelCloseArgs {
    #[arg(long)]
    pub user_channel_id: String,
    #[arg(long)]
    pub counterparty_node_id: String,
}

#[derive(Subcommand, Debug)]
pub enum PayCommand {
    /// BOLT11 invoices
    Invoice {
        #[command(subcommand)]
        command: InvoiceCommand,
    },
    /// BOLT12 offers
    Offer {
        #[command(subcommand)]
        command: OfferCommand,
    },
    /// BOLT12 refunds
    Refund {
        #[command(subcommand)]
        command: RefundCommand,
    },
    /// Spontaneous payments
    Keysend {
        #[command(subcommand)]
        command: KeysendCommand,
    },
    /// List payments
    Ls,
    /// Show one payment
    Get { payment_id: String },
    /// Wait for a payment to resolve
    Wait {
        payment_id: String,
        /// Server-side wait limit in seconds
        #[arg(long)]
        wait_secs: Option<u64>,
    },
    /// Abandon an outbound payment
    Abandon { payment_id: String },
}

#[derive(Subcommand, Debug)]
pub enum InvoiceCommand {
    /// Create an invoice; variable-amount without --amount-msat
    Create {
        #[arg(long)]
        desc: String,
        #[arg(long)]
        amount_msat: Option<u64>,
        #[arg(long, default_value_t = 3600)]
        expiry_secs: u32,
    },
    /// Pay an invoice; --amount-msat is required for variable-amount invoices
    Pay {
        #[arg(long)]
        invoice: String,
        #[arg(long)]
        amount_msat: Option<u64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum OfferCommand {
    /// Create an offer; variable-amount without --amount-msat
    Create {
        #[arg(long)]
        desc: String,
        #[arg(long)]
        amount_msat: Option<u64>,
        #[arg(long, default_value_t = 3600)]
        expiry_secs: u32,
        /// Do not set an expiry
        #[arg(long)]
        no_expiry: bool,
        #[arg(long)]
        quantity: Option<u64>,
    },
    /// Decode an offer
    Decode { offer: String },
    /// Pay an offer
    Pay {
        #[arg(long)]
        offer: String,
        #[arg(long)]
        amount_msat: Option<u64>,
        #[arg(long)]
        quantity: Option<u64>,
        #[arg(long)]
        payer_note: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RefundCommand {
    /// Create a refund as the payer
    Initiate {
        #[arg(long)]
        amount_msat: u64,
        #[arg(long, default_value_t = 3600)]
        expiry_secs: u32,
        #[arg(long)]
        quantity: Option<u64>,
        #[arg(long)]
        payer_note: Option<String>,
    },
    /// Decode a refund
    Decode { refund: String },
    /// Request payment of a refund as the payee
    RequestPayment { refund: String },
}

#[derive(Subcommand, Debug)]
pub enum KeysendCommand {
    /// Send a keysend payment
    Send {
        #[arg(long)]
        node_id: String,
        #[arg(long)]
        amount_msat: u64,
        /// Custom TLV record, repeatable
        #[arg(long, value_name = "TYPE:HEX")]
        tlv: Vec<TlvArg>,
    },
}

#[derive(Subcommand, Debug)]
pub enum EventsCommand {
    /// Wait for the next event without acknowledging it
    Next,
    /// Acknowledge the current event
    Handled,
    /// Print and acknowledge events until interrupted
    Watch {
        /// Stop after this many events
        #[arg(long)]
        count: Option<u64>,
    },
}

/// `--tlv TYPE:HEX`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TlvArg {
    pub r#type: u64,
    pub value_hex: String,
}

impl FromStr for TlvArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (t, hex) = s.split_once(':').ok_or_else(|| "expected TYPE:HEX".to_string())?;
        let r#type = t.trim().parse().map_err(|_| format!("invalid TLV type: {t}"))?;
        if hex.len() % 2 != 0 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid TLV value (expected even-length hex): {hex}"));
        }
        Ok(Self { r#type, value_hex: hex.to_string() })
    }
}
