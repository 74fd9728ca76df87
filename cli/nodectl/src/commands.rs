//! Command handlers. Each maps one subcommand onto one or a few client calls.

use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use api::http::{
    Bolt11PayRequest, Bolt11ReceiveRequest, Bolt11ReceiveVarRequest, Bolt12OfferDecodeRequest,
    Bolt12OfferReceiveRequest, Bolt12OfferReceiveVarRequest, Bolt12OfferSendRequest,
    Bolt12RefundDecodeRequest, Bolt12RefundInitiateRequest, Bolt12RefundRequestPaymentRequest,
    CloseChannelRequest, CustomTlvDto, HealthCheckDto, OpenChannelRequest, PaymentWaitRequest,
    PeerConnectRequest, PeerDisconnectRequest, SpontaneousSendRequest,
};
use client::{CancellationToken, ErrorBody, HttpError, NodeClient, RequestOptions};
use config::{CliConfig, ConfigError};
use numeric::Value;

use crate::cli::{
    ChannelCommand, Cli, Command, CtxCommand, EventsCommand, InvoiceCommand, KeysendCommand,
    NodeCommand, OfferCommand, PayCommand, PeerCommand, RefundCommand, WalletCommand,
};
use crate::error::{CliError, CliResult};
use crate::output::{amount, balance, balance_delta, event_line, OutputMode, Printer};
use crate::spinner::Spinner;

/// Runs one parsed command line.
pub async fn run(cli: Cli) -> CliResult<ExitCode> {
    let config_path = match cli.config {
        Some(path) => path,
        None => CliConfig::default_path()?,
    };
    let mut cfg = CliConfig::load(&config_path)?;
    let mode = OutputMode::resolve(cli.output);
    let out = Printer::new(mode, cli.pretty, cli.no_truncate, cli.color);

    let connect = |cfg: &CliConfig| -> CliResult<App> {
        let node_url = cfg.resolve_connect(cli.connect.as_deref());
        let node = NodeClient::new(api::api_root(&node_url))?;
        tracing::debug!(url = node.base_url(), "using node");

        let mut opts = RequestOptions::new();
        if let Some(secs) = cli.timeout_secs.or(cfg.timeout_secs) {
            opts = opts.with_timeout(Duration::from_secs(secs));
        }
        Ok(App { node, opts, out, yes: cli.yes })
    };

    match cli.command {
        Command::Ctx { command } => ctx(command, &mut cfg, &config_path, out),
        Command::Node { command } => connect(&cfg)?.node(command).await,
        Command::Wallet { command } => connect(&cfg)?.wallet(command).await,
        Command::Peer { command } => connect(&cfg)?.peer(command).await,
        Command::Channel { command } => connect(&cfg)?.channel(command).await,
        Command::Pay { command } => connect(&cfg)?.pay(command).await,
        Command::Events { command } => connect(&cfg)?.events(command).await,
    }
}

fn ctx(command: CtxCommand, cfg: &mut CliConfig, path: &Path, out: Printer) -> CliResult<ExitCode> {
    match command {
        CtxCommand::Ls => {
            if out.is_json() {
                out.json(&*cfg)?;
            } else {
                let rows = cfg
                    .contexts
                    .iter()
                    .map(|(name, c)| {
                        let active = cfg.current.as_deref() == Some(name.as_str());
                        let mark = if active { "*" } else { "" };
                        vec![mark.to_string(), name.clone(), c.url.clone()]
                    })
                    .collect();
                out.table(&["Current", "Name", "URL"], rows);
            }
        }
        CtxCommand::Show => {
            let (name, entry) = cfg.current_context()?;
            out.emit(entry, |e| println!("{name} -> {}", e.url))?;
        }
        CtxCommand::Add(args) => {
            let active = cfg.add_context(&args.name, &args.url, args.use_now);
            cfg.save(path)?;
            if out.is_json() {
                out.json(&*cfg)?;
            } else {
                if active {
                    println!("Context \"{}\" created and set as active.", args.name);
                } else {
                    println!("Context \"{}\" created.", args.name);
                }
                println!("Next: run `nodectl node status` to verify the connection.");
            }
        }
        CtxCommand::Use { name } => {
            cfg.use_context(&name)?;
            cfg.save(path)?;
            if out.is_json() {
                out.json(&*cfg)?;
            } else {
                println!("Switched to context \"{name}\".");
            }
        }
        CtxCommand::Rm { name } => {
            if cfg.remove_context(&name).is_none() {
                return Err(ConfigError::ContextNotFound(name).into());
            }
            cfg.save(path)?;
            if out.is_json() {
                out.json(&*cfg)?;
            } else {
                println!("Context \"{name}\" removed.");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// A connected command context.
struct App {
    node: NodeClient,
    opts: RequestOptions,
    out: Printer,
    yes: bool,
}

impl App {
    async fn node(&self, command: NodeCommand) -> CliResult<ExitCode> {
        let out = self.out;
        match command {
            NodeCommand::Health => {
                let v = self.node.healthz(&self.opts).await?;
                out.emit(&v, |v| out.checks("node health", v.ok, &v.checks))?;
            }
            NodeCommand::Ready => {
                let v = self.node.readyz(&self.opts).await?;
                out.emit(&v, |v| out.checks("node ready", v.ok, &v.checks))?;
                if !v.ok {
                    return Ok(ExitCode::FAILURE);
                }
            }
            NodeCommand::Status => {
                let s = self.node.status(&self.opts).await?;
                out.emit(&s, |s| {
                    out.fields(vec![
                        ("is_running", s.is_running.to_string()),
                        ("p2p_is_listening", s.is_listening.to_string()),
                        ("best_block_height", s.best_block_height.to_string()),
                    ])
                })?;
            }
            NodeCommand::Id => {
                let v = self.node.node_id(&self.opts).await?;
                out.emit(&v, |v| println!("{}", v.node_id))?;
            }
            NodeCommand::Listen => {
                let v = self.node.listening_addresses(&self.opts).await?;
                out.emit(&v, |v| v.addresses.iter().for_each(|a| println!("{a}")))?;
            }
            NodeCommand::Version => {
                let v = self.node.version(&self.opts).await?;
                out.emit(&v, |v| {
                    let rows = v
                        .as_object()
                        .map(|obj| {
                            obj.iter()
                                .map(|(k, v)| {
                                    (k, v.as_str().map_or_else(|| v.to_string(), str::to_string))
                                })
                                .collect()
                        })
                        .unwrap_or_default();
                    out.fields(rows)
                })?;
            }
        }
        Ok(ExitCode::SUCCESS)
    }

    async fn wallet(&self, command: WalletCommand) -> CliResult<ExitCode> {
        let out = self.out;
        match command {
            WalletCommand::Balance { sats } => {
                let b = self.node.balances(&self.opts).await?;
                out.emit(&b, |b| {
                    let row = |label: &str, v: &numeric::Int| vec![label.into(), balance(v, sats)];
                    let rows = vec![
                        row("On-chain (total)", &b.total_onchain_balance_sats),
                        row("On-chain (spendable)", &b.spendable_onchain_balance_sats),
                        row("Anchor reserve", &b.total_anchor_channels_reserve_sats),
                        row("Lightning (total)", &b.total_lightning_balance_sats),
                    ];
                    out.table_right(&["Asset", "Balance"], rows, &[1])
                })?;
            }
            WalletCommand::Address => {
                let v = self.node.wallet_new_address(&self.opts).await?;
                out.emit(&v, |v| println!("{}", v.address))?;
            }
            WalletCommand::Sync if out.is_json() => {
                let v = self.node.wallet_sync(&self.opts).await?;
                out.json(&v)?;
            }
            WalletCommand::Sync => {
                let before = self.node.balances(&self.opts).await?;
                self.node.wallet_sync(&self.opts).await?;
                let after = self.node.balances(&self.opts).await?;

                println!("Wallet synced.");
                if before == after {
                    println!("No balance change.");
                } else {
                    println!(
                        "Balance change: on-chain total {}, spendable {}, lightning {}.",
                        balance_delta(
                            &before.total_onchain_balance_sats,
                            &after.total_onchain_balance_sats,
                        ),
                        balance_delta(
                            &before.spendable_onchain_balance_sats,
                            &after.spendable_onchain_balance_sats,
                        ),
                        balance_delta(
                            &before.total_lightning_balance_sats,
                            &after.total_lightning_balance_sats,
                        ),
                    );
                }
            }
        }
        Ok(ExitCode::SUCCESS)
    }

    async fn peer(&self, command: PeerCommand) -> CliResult<ExitCode> {
        let out = self.out;
        match command {
            PeerCommand::Ls => {
                let peers = self.node.peers(&self.opts).await?;
                out.emit(&peers, |peers| {
                    let rows = peers
                        .iter()
                        .map(|p| {
                            vec![
                                out.id(&p.node_id),
                                p.address.clone(),
                                p.is_connected.to_string(),
                                p.is_persisted.to_string(),
                            ]
                        })
                        .collect();
                    out.table(&["Node ID", "Address", "Connected", "Persisted"], rows)
                })?;
            }
            PeerCommand::Connect { node_id, addr, persist } => {
                let req = PeerConnectRequest { node_id, address: addr, persist };
                let v = self.node.peers_connect(&req, &self.opts).await?;
                out.emit(&v, |_| println!("Peer connected."))?;
            }
            PeerCommand::Disconnect { node_id } => {
                let req = PeerDisconnectRequest { node_id };
                let v = self.node.peers_disconnect(&req, &self.opts).await?;
                out.emit(&v, |_| println!("Peer disconnected."))?;
            }
        }
        Ok(ExitCode::SUCCESS)
    }

    async fn channel(&self, command: ChannelCommand) -> CliResult<ExitCode> {
        let out = self.out;
        match command {
            ChannelCommand::Ls => {
                let chans = self.node.channels(&self.opts).await?;
                out.emit(&chans, |chans| {
                    let rows = chans
                        .iter()
                        .map(|c| {
                            vec![
                                out.id(&c.user_channel_id),
                                out.id(&c.counterparty_node_id),
                                amount(Some(&c.channel_value_sats)),
                                c.is_channel_ready.to_string(),
                                c.is_usable.to_string(),
                            ]
                        })
                        .collect();
                    out.table_right(
                        &["User Channel ID", "Counterparty", "Capacity (sats)", "Ready", "Usable"],
                        rows,
                        &[2],
                    )
                })?;
            }
            ChannelCommand::Open(args) => {
                let req = OpenChannelRequest {
                    node_id: args.node_id,
                    address: args.addr,
                    channel_amount_sats: args.amount_sats,
                    push_to_counterparty_msat: args.push_msat,
                    announce: if args.private { Some(false) } else { None },
                };
                let resp = self.node.channel_open(&req, &self.opts).await?;
                out.emit(&resp, |r| println!("{}", r.user_channel_id))?;
            }
            ChannelCommand::Close(args) => {
                let req = CloseChannelRequest {
                    user_channel_id: args.user_channel_id,
                    counterparty_node_id: args.counterparty_node_id,
                };
                let v = self.node.channel_close(&req, &self.opts).await?;
                out.emit(&v, |_| println!("Channel close initiated."))?;
            }
            ChannelCommand::ForceClose(args) => {
                confirm(
                    self.yes,
                    "About to force-close a channel; funds stay time-locked until the close settles.",
                )?;
                let req = CloseChannelRequest {
                    user_channel_id: args.user_channel_id,
                    counterparty_node_id: args.counterparty_node_id,
                };
                let v = self.node.channel_force_close(&req, &self.opts).await?;
                out.emit(&v, |_| println!("Channel force-close initiated."))?;
            }
        }
        Ok(ExitCode::SUCCESS)
    }

    async fn pay(&self, command: PayCommand) -> CliResult<ExitCode> {
        let out = self.out;
        match command {
            PayCommand::Invoice { command } => self.invoice(command).await?,
            PayCommand::Offer { command } => self.offer(command).await?,
            PayCommand::Refund { command } => self.refund(command).await?,
            PayCommand::Keysend { command: KeysendCommand::Send { node_id, amount_msat, tlv } } => {
                let req = SpontaneousSendRequest {
                    counterparty_node_id: node_id,
                    amount_msat,
                    custom_tlvs: tlv
                        .into_iter()
                        .map(|t| CustomTlvDto { r#type: t.r#type, value_hex: t.value_hex })
                        .collect(),
                };
                let resp = self.node.spontaneous_send(&req, &self.opts).await?;
                out.emit(&resp, |r| println!("{}", r.payment_id))?;
            }
            PayCommand::Ls => {
                let payments = self.node.payments(&self.opts).await?;
                out.emit(&payments, |payments| {
                    let rows = payments
                        .iter()
                        .map(|p| {
                            vec![
                                out.id(&p.id),
                                out.status(p.status),
                                p.kind.to_string(),
                                p.direction.to_string(),
                                amount(p.amount_msat.as_ref()),
                                amount(p.fee_paid_msat.as_ref()),
                            ]
                        })
                        .collect();
                    out.table_right(
                        &["ID", "Status", "Kind", "Dir", "Amount (msat)", "Fee (msat)"],
                        rows,
                        &[4, 5],
                    )
                })?;
            }
            PayCommand::Get { payment_id } => {
                let p = self
                    .node
                    .payment(&payment_id, &self.opts)
                    .await?
                    .ok_or_else(|| CliError::NotFound(format!("payment not found: {payment_id}")))?;
                out.emit(&p, |p| {
                    out.fields(vec![
                        ("id", p.id.clone()),
                        ("direction", p.direction.to_string()),
                        ("status", out.status(p.status)),
                        ("kind", p.kind.to_string()),
                        ("kind_details", or_dash(p.kind_details.as_ref())),
                        ("amount (msat)", amount(p.amount_msat.as_ref())),
                        ("fee paid (msat)", amount(p.fee_paid_msat.as_ref())),
                    ])
                })?;
            }
            PayCommand::Wait { payment_id, wait_secs } => {
                let req = PaymentWaitRequest { timeout_secs: wait_secs };
                return self.payment_wait(&payment_id, &req).await;
            }
            PayCommand::Abandon { payment_id } => {
                let v = self.node.payment_abandon(&payment_id, &self.opts).await?;
                out.emit(&v, |v| out.checks("abandon payment", v.ok, &v.checks))?;
            }
        }
        Ok(ExitCode::SUCCESS)
    }

    /// A wait that ends unresolved comes back as an error status whose body
    /// still describes the payment; that is reported, not treated as a failure
    /// of the command itself, though the exit code is nonzero.
    async fn payment_wait(
        &self,
        payment_id: &str,
        req: &PaymentWaitRequest,
    ) -> CliResult<ExitCode> {
        let out = self.out;
        match self.node.payment_wait(payment_id, req, &self.opts).await {
            Ok(resp) => {
                out.emit(&resp, |r| {
                    out.checks("payment wait", r.ok, &r.checks);
                    println!("{}", r.payment.id);
                })?;
                Ok(if resp.ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
            }
            Err(client::Error::Http(HttpError {
                message,
                status: Some(_),
                body: ErrorBody::Json(body),
            })) => {
                if out.is_json() {
                    out.json(&body)?;
                } else {
                    eprintln!("{message}");
                    let checks = body
                        .get("checks")
                        .cloned()
                        .and_then(|c| numeric::from_value::<Vec<HealthCheckDto>>(c).ok());
                    if let Some(checks) = checks {
                        out.checks("details", false, &checks);
                    }
                    let id = body.get("payment").and_then(|p| p.get("id"));
                    if let Some(id) = id.and_then(Value::as_str) {
                        println!("{id}");
                    }
                }
                Ok(ExitCode::FAILURE)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn invoice(&self, command: InvoiceCommand) -> CliResult<()> {
        let out = self.out;
        match command {
            InvoiceCommand::Create { desc, amount_msat: Some(amount_msat), expiry_secs } => {
                let req = Bolt11ReceiveRequest { amount_msat, description: desc, expiry_secs };
                let resp = self.node.bolt11_receive(&req, &self.opts).await?;
                out.emit(&resp, |r| println!("{}", r.invoice))
            }
            InvoiceCommand::Create { desc, amount_msat: None, expiry_secs } => {
                let req = Bolt11ReceiveVarRequest { description: desc, expiry_secs };
                let resp = self.node.bolt11_receive_var(&req, &self.opts).await?;
                out.emit(&resp, |r| println!("{}", r.invoice))
            }
            InvoiceCommand::Pay { invoice, amount_msat } => {
                let req = Bolt11PayRequest { invoice, amount_msat };
                let resp = self.node.bolt11_pay(&req, &self.opts).await?;
                out.emit(&resp, |r| println!("{}", r.payment_id))
            }
        }
    }

    async fn offer(&self, command: OfferCommand) -> CliResult<()> {
        let out = self.out;
        match command {
            OfferCommand::Create { desc, amount_msat, expiry_secs, no_expiry, quantity } => {
                let expiry_secs = if no_expiry { None } else { Some(expiry_secs) };
                let resp = match amount_msat {
                    Some(amount_msat) => {
                        let req = Bolt12OfferReceiveRequest {
                            amount_msat,
                            description: desc,
                            expiry_secs,
                            quantity,
                        };
                        self.node.bolt12_offer_receive(&req, &self.opts).await?
                    }
                    None => {
                        let req = Bolt12OfferReceiveVarRequest { description: desc, expiry_secs };
                        self.node.bolt12_offer_receive_var(&req, &self.opts).await?
                    }
                };
                out.emit(&resp, |r| println!("{}", r.offer))
            }
            OfferCommand::Decode { offer } => {
                let req = Bolt12OfferDecodeRequest { offer };
                let d = self.node.bolt12_offer_decode(&req, &self.opts).await?;
                let dash = |s: &Option<String>| s.clone().unwrap_or_else(|| "-".into());
                out.emit(&d, |d| {
                    out.fields(vec![
                        ("offer_id", d.offer_id.clone()),
                        ("signing_pubkey", dash(&d.signing_pubkey)),
                        ("description", dash(&d.description)),
                        ("issuer", dash(&d.issuer)),
                        ("amount_msat", amount(d.amount_msat.as_ref())),
                        (
                            "absolute_expiry_unix_secs",
                            or_dash(d.absolute_expiry_unix_secs.as_ref()),
                        ),
                        ("paths_count", d.paths_count.to_string()),
                        ("expects_quantity", d.expects_quantity.to_string()),
                        ("chain_hashes", d.chain_hashes.join(", ")),
                    ])
                })
            }
            OfferCommand::Pay { offer, amount_msat, quantity, payer_note } => {
                let req = Bolt12OfferSendRequest { offer, amount_msat, quantity, payer_note };
                let resp = self.node.bolt12_offer_send(&req, &self.opts).await?;
                out.emit(&resp, |r| println!("{}", r.payment_id))
            }
        }
    }

    async fn refund(&self, command: RefundCommand) -> CliResult<()> {
        let out = self.out;
        match command {
            RefundCommand::Initiate { amount_msat, expiry_secs, quantity, payer_note } => {
                let req =
                    Bolt12RefundInitiateRequest { amount_msat, expiry_secs, quantity, payer_note };
                let resp = self.node.bolt12_refund_initiate(&req, &self.opts).await?;
                out.emit(&resp, |r| {
                    println!("{}", r.refund);
                    eprintln!("payment_id: {}", r.payment_id);
                })
            }
            RefundCommand::Decode { refund } => {
                let req = Bolt12RefundDecodeRequest { refund };
                let d = self.node.bolt12_refund_decode(&req, &self.opts).await?;
                let dash = |s: &Option<String>| s.clone().unwrap_or_else(|| "-".into());
                out.emit(&d, |d| {
                    out.fields(vec![
                        ("description", d.description.clone()),
                        ("issuer", dash(&d.issuer)),
                        ("amount_msat", amount(Some(&d.amount_msat))),
                        (
                            "absolute_expiry_unix_secs",
                            or_dash(d.absolute_expiry_unix_secs.as_ref()),
                        ),
                        ("chain_hash", d.chain_hash.clone()),
                        ("payer_signing_pubkey", d.payer_signing_pubkey.clone()),
                        ("payer_note", dash(&d.payer_note)),
                        ("quantity", or_dash(d.quantity.as_ref())),
                        ("paths_count", d.paths_count.to_string()),
                    ])
                })
            }
            RefundCommand::RequestPayment { refund } => {
                let req = Bolt12RefundRequestPaymentRequest { refund };
                let resp = self.node.bolt12_refund_request_payment(&req, &self.opts).await?;
                out.emit(&resp, |r| {
                    println!("{}", r.invoice);
                    eprintln!("payment_id: {}", r.payment_id);
                })
            }
        }
    }

    async fn events(&self, command: EventsCommand) -> CliResult<ExitCode> {
        let out = self.out;
        match command {
            EventsCommand::Next => {
                let spinner = Spinner::new("Waiting for event...", !out.is_json());
                let ev = spinner.wrap(self.node.events_wait_next(&self.opts)).await?;
                out.emit(&ev, |ev| println!("{}", event_line(ev)))?;
            }
            EventsCommand::Handled => {
                let v = self.node.events_handled(&self.opts).await?;
                out.emit(&v, |_| println!("Marked handled."))?;
            }
            EventsCommand::Watch { count } => {
                let shutdown = CancellationToken::new();
                let trigger = shutdown.clone();
                let signals = tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        tracing::info!("interrupt received, stopping");
                        trigger.cancel();
                    }
                });

                let spinner = Spinner::new("Waiting for events...", !out.is_json());
                spinner.start();
                let result = self
                    .node
                    .event_loop()
                    .watch(count, self.opts.timeout, &shutdown, |ev| {
                        spinner.stop();
                        let printed = out
                            .emit(&ev, |ev| println!("{}", event_line(ev)))
                            .map_err(client::Error::handler);
                        spinner.start();
                        std::future::ready(printed)
                    })
                    .await;
                spinner.stop();
                signals.abort();

                let handled = result?;
                if !out.is_json() {
                    eprintln!("{handled} event(s) handled.");
                }
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}

fn or_dash<T: ToString>(v: Option<&T>) -> String { v.map_or_else(|| "-".into(), T::to_string) }

fn confirm(yes: bool, prompt: &str) -> CliResult<()> {
    if yes {
        return Ok(());
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Aborted(format!(
            "{prompt}\nRefusing to proceed non-interactively without --yes."
        )));
    }
    eprintln!("{prompt} Type 'yes' to continue:");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    if line.trim() != "yes" {
        return Err(CliError::Aborted("aborted".to_string()));
    }
    Ok(())
}
