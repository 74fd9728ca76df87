//! One method per endpoint. Each is pure data fed to the executor.

use api::http::{
    BalancesDto, Bolt11DecodeRequest, Bolt11DecodeResponse, Bolt11PayRequest, Bolt11PayResponse,
    Bolt11ReceiveRequest, Bolt11ReceiveResponse, Bolt11ReceiveVarRequest, Bolt11SendRequest,
    Bolt11SendUsingAmountRequest, Bolt12OfferDecodeRequest, Bolt12OfferDecodeResponse,
    Bolt12OfferReceiveRequest, Bolt12OfferReceiveVarRequest, Bolt12OfferResponse,
    Bolt12OfferSendRequest, Bolt12RefundDecodeRequest, Bolt12RefundDecodeResponse,
    Bolt12RefundInitiateRequest, Bolt12RefundInitiateResponse, Bolt12RefundRequestPaymentRequest,
    Bolt12RefundRequestPaymentResponse, ChannelDetailsExtendedDto, CloseChannelRequest, EventDto,
    ListeningAddressesResponse, NewAddressResponse, NodeIdResponse, OkResponse,
    OpenChannelRequest, OpenChannelResponse, PaymentDetailsDto, PaymentWaitRequest,
    PaymentWaitResponse, PeerConnectRequest, PeerDetailsDto, PeerDisconnectRequest, SendResponse,
    SpontaneousSendRequest, StatusDto,
};
use numeric::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;
use transport::Method;

use crate::error::{Error, ErrorBody, HttpError, Result};
use crate::executor::{narrow, NO_BODY};
use crate::options::{NotFound, RequestOptions};
use crate::NodeClient;

/// `{}`, sent by POST endpoints that take no parameters.
#[derive(Serialize)]
struct Empty {}

impl NodeClient {
    async fn get<T: DeserializeOwned>(&self, path: &str, options: &RequestOptions) -> Result<T> {
        let value = self
            .executor
            .execute(Method::Get, path, NO_BODY, options, NotFound::Error)
            .await?
            .unwrap_or_else(Value::empty_object);
        narrow(path, value)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        options: &RequestOptions,
    ) -> Result<T> {
        let value = self
            .executor
            .execute(Method::Post, path, Some(body), options, NotFound::Error)
            .await?
            .unwrap_or_else(Value::empty_object);
        narrow(path, value)
    }

    // ---- node ----

    /// `GET /healthz`
    pub async fn healthz(&self, options: &RequestOptions) -> Result<OkResponse> {
        self.get("/healthz", options).await
    }

    /// `GET /readyz`. A not-ready node answers `503` with the same body
    /// shape, which is returned as `ok: false` rather than an error.
    pub async fn readyz(&self, options: &RequestOptions) -> Result<OkResponse> {
        match self.get("/readyz", options).await {
            Err(Error::Http(e)) if e.status == Some(503) => match e.body {
                ErrorBody::Json(body) => narrow("/readyz", body),
                body => Err(Error::Http(HttpError { body, ..e })),
            },
            other => other,
        }
    }

    /// `GET /version`. The shape is free-form, so the decoded value is returned as is.
    pub async fn version(&self, options: &RequestOptions) -> Result<Value> {
        self.get("/version", options).await
    }

    /// `GET /status`
    pub async fn status(&self, options: &RequestOptions) -> Result<StatusDto> {
        self.get("/status", options).await
    }

    /// `GET /node_id`
    pub async fn node_id(&self, options: &RequestOptions) -> Result<NodeIdResponse> {
        self.get("/node_id", options).await
    }

    /// `GET /listening_addresses`
    pub async fn listening_addresses(
        &self,
        options: &RequestOptions,
    ) -> Result<ListeningAddressesResponse> {
        self.get("/listening_addresses", options).await
    }

    // ---- wallet ----

    /// `POST /wallet/new_address`
    pub async fn wallet_new_address(&self, options: &RequestOptions) -> Result<NewAddressResponse> {
        self.post("/wallet/new_address", &Empty {}, options).await
    }

    /// `POST /wallet/sync`
    pub async fn wallet_sync(&self, options: &RequestOptions) -> Result<OkResponse> {
        self.post("/wallet/sync", &Empty {}, options).await
    }

    /// `GET /balances`
    pub async fn balances(&self, options: &RequestOptions) -> Result<BalancesDto> {
        self.get("/balances", options).await
    }

    // ---- peers ----

    /// `GET /peers`
    pub async fn peers(&self, options: &RequestOptions) -> Result<Vec<PeerDetailsDto>> {
        self.get("/peers", options).await
    }

    /// `POST /peers/connect`
    pub async fn peers_connect(
        &self,
        req: &PeerConnectRequest,
        options: &RequestOptions,
    ) -> Result<OkResponse> {
        self.post("/peers/connect", req, options).await
    }

    /// `POST /peers/disconnect`
    pub async fn peers_disconnect(
        &self,
        req: &PeerDisconnectRequest,
        options: &RequestOptions,
    ) -> Result<OkResponse> {
        self.post("/peers/disconnect", req, options).await
    }

    // ---- channels ----

    /// `GET /channels`
    pub async fn channels(
        &self,
        options: &RequestOptions,
    ) -> Result<Vec<ChannelDetailsExtendedDto>> {
        self.get("/channels", options).await
    }

    /// `POST /channel/open`
    pub async fn channel_open(
        &self,
        req: &OpenChannelRequest,
        options: &RequestOptions,
    ) -> Result<OpenChannelResponse> {
        self.post("/channel/open", req, options).await
    }

    /// `POST /channel/close`
    pub async fn channel_close(
        &self,
        req: &CloseChannelRequest,
        options: &RequestOptions,
    ) -> Result<OkResponse> {
        self.post("/channel/close", req, options).await
    }

    /// `POST /channel/force_close`
    pub async fn channel_force_close(
        &self,
        req: &CloseChannelRequest,
        options: &RequestOptions,
    ) -> Result<OkResponse> {
        self.post("/channel/force_close", req, options).await
    }

    // ---- bolt11 ----

    /// `POST /bolt11/receive`
    pub async fn bolt11_receive(
        &self,
        req: &Bolt11ReceiveRequest,
        options: &RequestOptions,
    ) -> Result<Bolt11ReceiveResponse> {
        self.post("/bolt11/receive", req, options).await
    }

    /// `POST /bolt11/receive_var`
    pub async fn bolt11_receive_var(
        &self,
        req: &Bolt11ReceiveVarRequest,
        options: &RequestOptions,
    ) -> Result<Bolt11ReceiveResponse> {
        self.post("/bolt11/receive_var", req, options).await
    }

    /// `POST /bolt11/decode`
    pub async fn bolt11_decode(
        &self,
        req: &Bolt11DecodeRequest,
        options: &RequestOptions,
    ) -> Result<Bolt11DecodeResponse> {
        self.post("/bolt11/decode", req, options).await
    }

    /// `POST /bolt11/send`
    pub async fn bolt11_send(
        &self,
        req: &Bolt11SendRequest,
        options: &RequestOptions,
    ) -> Result<SendResponse> {
        self.post("/bolt11/send", req, options).await
    }

    /// `POST /bolt11/send_using_amount`
    pub async fn bolt11_send_using_amount(
        &self,
        req: &Bolt11SendUsingAmountRequest,
        options: &RequestOptions,
    ) -> Result<SendResponse> {
        self.post("/bolt11/send_using_amount", req, options).await
    }

    /// `POST /bolt11/pay`. Returns once the payment has completed.
    pub async fn bolt11_pay(
        &self,
        req: &Bolt11PayRequest,
        options: &RequestOptions,
    ) -> Result<Bolt11PayResponse> {
        self.post("/bolt11/pay", req, options).await
    }

    // ---- bolt12 ----

    /// `POST /bolt12/offer/receive`
    pub async fn bolt12_offer_receive(
        &self,
        req: &Bolt12OfferReceiveRequest,
        options: &RequestOptions,
    ) -> Result<Bolt12OfferResponse> {
        self.post("/bolt12/offer/receive", req, options).await
    }

    /// `POST /bolt12/offer/receive_var`
    pub async fn bolt12_offer_receive_var(
        &self,
        req: &Bolt12OfferReceiveVarRequest,
        options: &RequestOptions,
    ) -> Result<Bolt12OfferResponse> {
        self.post("/bolt12/offer/receive_var", req, options).await
    }

    /// `POST /bolt12/offer/decode`
    pub async fn bolt12_offer_decode(
        &self,
        req: &Bolt12OfferDecodeRequest,
        options: &RequestOptions,
    ) -> Result<Bolt12OfferDecodeResponse> {
        self.post("/bolt12/offer/decode", req, options).await
    }

    /// `POST /bolt12/offer/send`
    pub async fn bolt12_offer_send(
        &self,
        req: &Bolt12OfferSendRequest,
        options: &RequestOptions,
    ) -> Result<SendResponse> {
        self.post("/bolt12/offer/send", req, options).await
    }

    /// `POST /bolt12/refund/initiate`
    pub async fn bolt12_refund_initiate(
        &self,
        req: &Bolt12RefundInitiateRequest,
        options: &RequestOptions,
    ) -> Result<Bolt12RefundInitiateResponse> {
        self.post("/bolt12/refund/initiate", req, options).await
    }

    /// `POST /bolt12/refund/decode`
    pub async fn bolt12_refund_decode(
        &self,
        req: &Bolt12RefundDecodeRequest,
        options: &RequestOptions,
    ) -> Result<Bolt12RefundDecodeResponse> {
        self.post("/bolt12/refund/decode", req, options).await
    }

    /// `POST /bolt12/refund/request_payment`
    pub async fn bolt12_refund_request_payment(
        &self,
        req: &Bolt12RefundRequestPaymentRequest,
        options: &RequestOptions,
    ) -> Result<Bolt12RefundRequestPaymentResponse> {
        self.post("/bolt12/refund/request_payment", req, options).await
    }

    // ---- payments ----

    /// `POST /spontaneous/send`. Custom TLVs go out as `[]` when there are none.
    pub async fn spontaneous_send(
        &self,
        req: &SpontaneousSendRequest,
        options: &RequestOptions,
    ) -> Result<SendResponse> {
        self.post("/spontaneous/send", req, options).await
    }

    /// `GET /payments`
    pub async fn payments(&self, options: &RequestOptions) -> Result<Vec<PaymentDetailsDto>> {
        self.get("/payments", options).await
    }

    /// `GET /payment/{id}`. `None` if the node does not know the payment.
    pub async fn payment(
        &self,
        payment_id: &str,
        options: &RequestOptions,
    ) -> Result<Option<PaymentDetailsDto>> {
        let path = format!("/payment/{}", payment_segment(payment_id)?);
        match self.executor.execute(Method::Get, &path, NO_BODY, options, NotFound::Absent).await? {
            Some(value) => narrow(&path, value).map(Some),
            None => Ok(None),
        }
    }

    /// `POST /payment/{id}/wait`. A payment that does not resolve in time is
    /// reported by the node as an error status whose JSON body still carries
    /// the payment; see [`crate::ErrorBody::json`].
    pub async fn payment_wait(
        &self,
        payment_id: &str,
        req: &PaymentWaitRequest,
        options: &RequestOptions,
    ) -> Result<PaymentWaitResponse> {
        let path = format!("/payment/{}/wait", payment_segment(payment_id)?);
        self.post(&path, req, options).await
    }

    /// `POST /payment/{id}/abandon`
    pub async fn payment_abandon(
        &self,
        payment_id: &str,
        options: &RequestOptions,
    ) -> Result<OkResponse> {
        let path = format!("/payment/{}/abandon", payment_segment(payment_id)?);
        self.post(&path, &Empty {}, options).await
    }

    // ---- events ----

    /// `POST /events/wait_next`. Long-polls until the node has an event.
    ///
    /// Stateless: calling it twice without [`NodeClient::events_handled`] in
    /// between sends both requests. Use [`crate::EventLoop`] for the guarded protocol.
    pub async fn events_wait_next(&self, options: &RequestOptions) -> Result<EventDto> {
        self.post("/events/wait_next", &Empty {}, options).await
    }

    /// `POST /events/handled`. Acknowledges the last delivered event.
    pub async fn events_handled(&self, options: &RequestOptions) -> Result<OkResponse> {
        self.post("/events/handled", &Empty {}, options).await
    }
}

fn payment_segment(payment_id: &str) -> Result<String> {
    let id = payment_id.trim();
    if id.is_empty() {
        return Err(Error::InvalidArgument("payment id is required".to_string()));
    }
    Ok(urlencoding::encode(id).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_segment() {
        assert_eq!(payment_segment("ab01").expect("valid"), "ab01");
        assert_eq!(payment_segment("a/b c").expect("valid"), "a%2Fb%20c");
        assert!(matches!(payment_segment(" "), Err(Error::InvalidArgument(_))));
    }
}
