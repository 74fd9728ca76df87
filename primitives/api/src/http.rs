//! HTTP API request/response types.

use std::fmt;

use numeric::{Int, Value};
use serde::{Deserialize, Serialize};

/// Node status response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusDto {
    /// Whether the node runtime is running.
    pub is_running: bool,
    /// Whether the node is currently listening for inbound peers.
    pub is_listening: bool,
    /// Current best block height as seen by the node.
    pub best_block_height: u32,
}

/// Response of `GET /node_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeIdResponse {
    /// Node public key in hex.
    pub node_id: String,
}

/// Response of `GET /listening_addresses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListeningAddressesResponse {
    /// Socket addresses the node accepts peers on.
    #[serde(default)]
    pub addresses: Vec<String>,
}

/// Response of `POST /wallet/new_address`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAddressResponse {
    /// Fresh on-chain address.
    pub address: String,
}

/// Wallet and channel balance overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancesDto {
    /// Total confirmed on-chain balance in satoshis.
    pub total_onchain_balance_sats: Int,
    /// Spendable on-chain balance in satoshis.
    pub spendable_onchain_balance_sats: Int,
    /// Sum of sats reserved for anchor channels.
    pub total_anchor_channels_reserve_sats: Int,
    /// Total claimable Lightning balance in satoshis.
    pub total_lightning_balance_sats: Int,
}

/// Peer details entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerDetailsDto {
    /// Peer node id in hex.
    pub node_id: String,
    /// Selected address for the peer.
    pub address: String,
    /// Whether peer is persisted to peer store.
    pub is_persisted: bool,
    /// Whether peer is currently connected.
    pub is_connected: bool,
}

/// Request to connect to a peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerConnectRequest {
    /// Peer node id in hex.
    pub node_id: String,
    /// Socket address, e.g. `lnd1:9735`.
    pub address: String,
    /// Whether to persist the peer to disk.
    #[serde(default)]
    pub persist: bool,
}

/// Request to disconnect a peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerDisconnectRequest {
    /// Peer node id in hex.
    pub node_id: String,
}

/// Which side initiated a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentDirection {
    /// Received by this node.
    Inbound,
    /// Sent by this node.
    Outbound,
}

/// Lifecycle state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Not yet resolved.
    Pending,
    /// Completed.
    Succeeded,
    /// Gave up.
    Failed,
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentKind {
    /// BOLT11 invoice.
    Bolt11,
    /// BOLT11 invoice over a just-in-time channel.
    Bolt11Jit,
    /// BOLT12 offer.
    Bolt12Offer,
    /// BOLT12 refund.
    Bolt12Refund,
    /// Keysend.
    Spontaneous,
    /// On-chain transaction.
    Onchain,
}

macro_rules! display_as_debug {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Debug::fmt(self, f) }
        })*
    };
}

display_as_debug!(PaymentDirection, PaymentStatus, PaymentKind);

/// Payment details entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetailsDto {
    /// Payment id (hex-encoded 32 bytes).
    pub id: String,
    /// Direction.
    pub direction: PaymentDirection,
    /// Status.
    pub status: PaymentStatus,
    /// Amount in millisatoshis, if known.
    pub amount_msat: Option<Int>,
    /// Payment kind.
    pub kind: PaymentKind,
    /// Fee paid in millisatoshis, if known.
    pub fee_paid_msat: Option<Int>,
    /// Kind-specific details; shape varies with `kind` and is passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind_details: Option<Value>,
}

/// Channel details entry (extended for control-plane integrations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDetailsExtendedDto {
    /// Channel id (32-byte hex).
    pub channel_id: String,
    /// User channel id (hex-encoded 16 bytes big-endian).
    pub user_channel_id: String,
    /// Counterparty node id (hex pubkey).
    pub counterparty_node_id: String,
    /// Funding outpoint formatted as `txid:vout` if known.
    pub channel_point: Option<String>,
    /// Total channel capacity in satoshis.
    pub channel_value_sats: Int,
    /// Sendable capacity in millisatoshis.
    pub outbound_capacity_msat: Int,
    /// Receivable capacity in millisatoshis.
    pub inbound_capacity_msat: Int,
    /// Whether channel is ready.
    pub is_channel_ready: bool,
    /// Whether channel is usable.
    pub is_usable: bool,
    /// Whether channel is announced.
    pub is_announced: bool,
}

/// Request to open a channel to a peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenChannelRequest {
    /// Counterparty node id (hex secp256k1 pubkey).
    pub node_id: String,
    /// Socket address of the counterparty as advertised.
    pub address: String,
    /// Channel capacity in satoshis.
    pub channel_amount_sats: u64,
    /// Optional initial push to counterparty in msat.
    pub push_to_counterparty_msat: Option<u64>,
    /// Whether to create an announced channel (server default: true).
    pub announce: Option<bool>,
}

/// Response of a successful channel open request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenChannelResponse {
    /// User channel id (hex-encoded 16 bytes big-endian).
    pub user_channel_id: String,
}

/// Request to close or force-close a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseChannelRequest {
    /// User channel id (hex-encoded 16 bytes big-endian).
    pub user_channel_id: String,
    /// Counterparty node id.
    pub counterparty_node_id: String,
}

/// Request to create a fixed-amount BOLT11 invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt11ReceiveRequest {
    /// Amount in millisatoshis.
    pub amount_msat: u64,
    /// Invoice description.
    pub description: String,
    /// Invoice expiry in seconds.
    pub expiry_secs: u32,
}

/// Request to create a variable-amount BOLT11 invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt11ReceiveVarRequest {
    /// Invoice description.
    pub description: String,
    /// Invoice expiry in seconds.
    pub expiry_secs: u32,
}

/// Response containing a newly created BOLT11 invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt11ReceiveResponse {
    /// The invoice string.
    pub invoice: String,
}

/// Request to decode a BOLT11 invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt11DecodeRequest {
    /// The invoice string.
    pub invoice: String,
}

/// Decoded BOLT11 invoice summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt11DecodeResponse {
    /// Payment hash (hex).
    pub payment_hash: String,
    /// Destination node id (hex pubkey).
    pub destination: String,
    /// Amount in millisatoshis, if the invoice is fixed-amount.
    pub amount_msat: Option<Int>,
    /// Invoice expiry in seconds.
    pub expiry_secs: u64,
}

/// Request to pay a BOLT11 invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt11SendRequest {
    /// The invoice string.
    pub invoice: String,
}

/// Request to pay a BOLT11 invoice using a specified amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt11SendUsingAmountRequest {
    /// The invoice string.
    pub invoice: String,
    /// Amount in millisatoshis to pay.
    pub amount_msat: u64,
}

/// Request to pay a BOLT11 invoice and wait for completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt11PayRequest {
    /// The invoice string.
    pub invoice: String,
    /// Amount in millisatoshis (required for variable-amount invoices).
    pub amount_msat: Option<u64>,
}

/// Response of a completed BOLT11 payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt11PayResponse {
    /// Payment id (hex-encoded 32 bytes).
    pub payment_id: String,
    /// Payment preimage (hex-encoded 32 bytes).
    pub preimage: String,
    /// Amount paid in satoshis.
    pub amount_sats: Int,
    /// Destination node id (hex pubkey).
    pub destination: String,
    /// Fee paid in millisatoshis, if known.
    pub fee_paid_msat: Option<Int>,
}

/// Response containing the id of a sent payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendResponse {
    /// Payment id (hex-encoded 32 bytes).
    pub payment_id: String,
}

/// Request to create a fixed-amount BOLT12 offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt12OfferReceiveRequest {
    /// Amount in millisatoshis.
    pub amount_msat: u64,
    /// Offer description.
    pub description: String,
    /// Offer expiry in seconds.
    pub expiry_secs: Option<u32>,
    /// Maximum quantity per invoice request.
    pub quantity: Option<u64>,
}

/// Request to create a variable-amount BOLT12 offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt12OfferReceiveVarRequest {
    /// Offer description.
    pub description: String,
    /// Offer expiry in seconds.
    pub expiry_secs: Option<u32>,
}

/// Response containing a BOLT12 offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt12OfferResponse {
    /// Bech32 `lno…` string.
    pub offer: String,
}

/// Request to decode a BOLT12 offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt12OfferDecodeRequest {
    /// Bech32 `lno…` string.
    pub offer: String,
}

/// Decoded BOLT12 offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt12OfferDecodeResponse {
    /// Offer id (hex).
    pub offer_id: String,
    /// Signing public key, if the offer carries one.
    #[serde(default)]
    pub signing_pubkey: Option<String>,
    /// Offer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Issuer.
    #[serde(default)]
    pub issuer: Option<String>,
    /// Amount in millisatoshis, absent for variable-amount offers.
    #[serde(default)]
    pub amount_msat: Option<Int>,
    /// Absolute expiry as a unix timestamp.
    #[serde(default)]
    pub absolute_expiry_unix_secs: Option<Int>,
    /// Chains the offer is valid for.
    #[serde(default)]
    pub chain_hashes: Vec<String>,
    /// Number of blinded paths.
    pub paths_count: u32,
    /// Whether the payer must specify a quantity.
    pub expects_quantity: bool,
}

/// Request to pay a BOLT12 offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt12OfferSendRequest {
    /// Bech32 `lno…` string.
    pub offer: String,
    /// Amount in millisatoshis (required for variable-amount offers).
    pub amount_msat: Option<u64>,
    /// Quantity to request.
    pub quantity: Option<u64>,
    /// Note attached to the invoice request.
    pub payer_note: Option<String>,
}

/// Request to initiate a BOLT12 refund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt12RefundInitiateRequest {
    /// Amount in millisatoshis.
    pub amount_msat: u64,
    /// Refund expiry in seconds.
    pub expiry_secs: u32,
    /// Quantity.
    pub quantity: Option<u64>,
    /// Note to the payee.
    pub payer_note: Option<String>,
}

/// Response of a refund initiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt12RefundInitiateResponse {
    /// Bech32 `lnr…` string.
    pub refund: String,
    /// Payment id tracking the refund.
    pub payment_id: String,
}

/// Request to decode a BOLT12 refund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt12RefundDecodeRequest {
    /// Bech32 `lnr…` string.
    pub refund: String,
}

/// Decoded BOLT12 refund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt12RefundDecodeResponse {
    /// Refund description.
    pub description: String,
    /// Issuer.
    #[serde(default)]
    pub issuer: Option<String>,
    /// Amount in millisatoshis.
    pub amount_msat: Int,
    /// Absolute expiry as a unix timestamp.
    #[serde(default)]
    pub absolute_expiry_unix_secs: Option<Int>,
    /// Chain the refund is valid for.
    pub chain_hash: String,
    /// Payer signing public key.
    pub payer_signing_pubkey: String,
    /// Note from the payer.
    #[serde(default)]
    pub payer_note: Option<String>,
    /// Quantity.
    #[serde(default)]
    pub quantity: Option<Int>,
    /// Number of blinded paths.
    pub paths_count: u32,
}

/// Request to pay out a BOLT12 refund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt12RefundRequestPaymentRequest {
    /// Bech32 `lnr…` string.
    pub refund: String,
}

/// Invoice issued in response to a refund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt12RefundRequestPaymentResponse {
    /// Bech32 invoice.
    pub invoice: String,
    /// Raw invoice bytes in hex.
    pub invoice_hex: String,
    /// Payment id.
    pub payment_id: String,
}

/// Request to send a spontaneous (keysend) payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpontaneousSendRequest {
    /// Counterparty node id (hex pubkey).
    pub counterparty_node_id: String,
    /// Amount in millisatoshis.
    pub amount_msat: u64,
    /// Custom TLV records; sent as `[]` when empty.
    #[serde(default)]
    pub custom_tlvs: Vec<CustomTlvDto>,
}

/// Custom TLV record as passed to keysend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTlvDto {
    /// TLV type number.
    pub r#type: u64,
    /// Hex-encoded value bytes.
    pub value_hex: String,
}

/// Request to wait for a payment to resolve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentWaitRequest {
    /// Server-side wait limit in seconds.
    pub timeout_secs: Option<u64>,
}

/// Outcome of a payment wait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentWaitResponse {
    /// Whether the payment resolved successfully.
    pub ok: bool,
    /// Final (or last observed) payment state.
    pub payment: PaymentDetailsDto,
    /// Supporting sub-checks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<HealthCheckDto>,
}

/// Generic `{ ok: true }` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OkResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Optional list of sub-checks providing more details about how `ok` was determined.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<HealthCheckDto>,
}

/// A single health/readiness sub-check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckDto {
    /// Machine-readable check name.
    pub name: String,
    /// Whether the check passed.
    pub ok: bool,
    /// Optional short detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Optional user-actionable hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Generic `{ error: "..." }` error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Outpoint representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutPointDto {
    /// Transaction id (hex string).
    pub txid: String,
    /// Output index.
    pub vout: u32,
}

impl fmt::Display for OutPointDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

/// Event returned by `/events/wait_next`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EventDto {
    /// A sent payment succeeded.
    PaymentSuccessful {
        /// Optional payment id.
        payment_id: Option<String>,
        /// Total fee paid in millisatoshis, if provided.
        fee_paid_msat: Option<Int>,
    },
    /// A sent payment failed.
    PaymentFailed {
        /// Optional payment id.
        payment_id: Option<String>,
    },
    /// A payment has been received.
    PaymentReceived {
        /// Optional payment id.
        payment_id: Option<String>,
        /// Amount received in millisatoshis.
        amount_msat: Int,
    },
    /// A channel has been created and is pending on-chain confirmation.
    ChannelPending {
        /// Funding outpoint of the channel transaction.
        funding_txo: OutPointDto,
    },
    /// A channel is ready to be used.
    ChannelReady {
        /// User channel id (hex-encoded 16 bytes big-endian).
        user_channel_id: String,
    },
    /// A channel has been closed. Older nodes send an empty payload.
    ChannelClosed {
        /// Channel id (hex-encoded 32 bytes).
        #[serde(default)]
        channel_id: String,
        /// User channel id (hex-encoded 16 bytes big-endian).
        #[serde(default)]
        user_channel_id: String,
        /// Counterparty node id (hex pubkey), if known.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        counterparty_node_id: Option<String>,
        /// Closure reason, if provided by the node.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Other event kinds (not explicitly modeled).
    Other {
        /// Name of the event kind.
        kind: String,
    },
}

impl EventDto {
    /// Variant name as it appears in the `type` field.
    pub fn kind(&self) -> &str {
        match self {
            EventDto::PaymentSuccessful { .. } => "PaymentSuccessful",
            EventDto::PaymentFailed { .. } => "PaymentFailed",
            EventDto::PaymentReceived { .. } => "PaymentReceived",
            EventDto::ChannelPending { .. } => "ChannelPending",
            EventDto::ChannelReady { .. } => "ChannelReady",
            EventDto::ChannelClosed { .. } => "ChannelClosed",
            EventDto::Other { kind } => kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use numeric::{decode, from_value};

    use super::*;

    #[test]
    fn test_payment_details_large_amount() {
        let body = r#"{"id":"aa","direction":"Inbound","status":"Succeeded",
            "amount_msat":9223372036854770000,"kind":"Bolt12Offer","fee_paid_msat":null,
            "kind_details":{"offer_id":"ff","quantity":2}}"#;
        let p: PaymentDetailsDto = from_value(decode(body).expect("json")).expect("shape");

        assert_eq!(p.amount_msat, Some(Int::from(9_223_372_036_854_770_000u64)));
        assert_eq!(p.direction, PaymentDirection::Inbound);
        assert_eq!(p.kind, PaymentKind::Bolt12Offer);
        assert_eq!(p.status.to_string(), "Succeeded");
        let details = p.kind_details.expect("details kept");
        assert_eq!(details.get("offer_id").and_then(Value::as_str), Some("ff"));
    }

    #[test]
    fn test_event_adjacent_tagging() {
        let body = r#"{"type":"PaymentReceived","data":{"payment_id":"ab","amount_msat":1000}}"#;
        let ev: EventDto = from_value(decode(body).expect("json")).expect("shape");
        assert_eq!(
            ev,
            EventDto::PaymentReceived {
                payment_id: Some("ab".into()),
                amount_msat: Int::from(1000u64),
            }
        );
        assert_eq!(ev.kind(), "PaymentReceived");

        let raw = decode(r#"{"type":"ChannelClosed","data":{}}"#).expect("json");
        let closed: EventDto = from_value(raw).expect("shape");
        assert!(matches!(
            closed,
            EventDto::ChannelClosed { ref channel_id, .. } if channel_id.is_empty()
        ));
    }

    #[test]
    fn test_event_other_kind() {
        let body = r#"{"type":"Other","data":{"kind":"SpliceLocked"}}"#;
        let ev: EventDto = from_value(decode(body).expect("json")).expect("shape");
        assert_eq!(ev.kind(), "SpliceLocked");
    }

    #[test]
    fn test_ok_response_checks_default() {
        let ok: OkResponse = from_value(decode(r#"{"ok":false}"#).expect("json")).expect("shape");
        assert!(!ok.ok);
        assert!(ok.checks.is_empty());
        assert_eq!(serde_json::to_string(&ok).expect("serialize"), r#"{"ok":false}"#);
    }

    #[test]
    fn test_custom_tlv_type_key() {
        let req = SpontaneousSendRequest {
            counterparty_node_id: "02ab".into(),
            amount_msat: 5,
            custom_tlvs: vec![CustomTlvDto { r#type: 65537, value_hex: "00".into() }],
        };
        let json = serde_json::to_value(&req).expect("serialize");
        assert_eq!(json["custom_tlvs"][0]["type"], 65537);
    }

    #[test]
    fn test_outpoint_display() {
        let op = OutPointDto { txid: "ab".into(), vout: 1 };
        assert_eq!(op.to_string(), "ab:1");
    }
}
