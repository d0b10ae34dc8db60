use crate::app::AppState;
use crate::chat::ChatTurn;
use crate::domain::filters::parse_list_query;
use crate::domain::pricing::format_eth_with_fiat;
use crate::errors::ServerError;
use crate::ledger::{offering, Holding, ShareSupply};
use crate::responses::{error_to_response, json_ok, ResultResp};
use astra::{Request, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::io::Read;
use std::time::Instant;

const MAX_BODY_BYTES: u64 = 64 * 1024;

/// Entry point for the server loop: routes, turns errors into responses and
/// logs one line per request.
pub fn respond(req: Request, state: &AppState) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let resp = match handle(req, state) {
        Ok(resp) => resp,
        Err(err) => {
            match &err {
                ServerError::Internal(detail) => {
                    tracing::error!(%method, %path, error = %detail, "request failed")
                }
                other => tracing::debug!(%method, %path, error = %other, "request rejected"),
            }
            error_to_response(&err)
        }
    };

    tracing::info!(
        %method,
        %path,
        status = resp.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "handled request"
    );
    resp
}

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let params = parse_query(&req);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["health"]) => json_ok(&json!({ "status": "ok" })),

        ("GET", ["properties"]) => list_properties(state, &params),
        ("GET", ["properties", "meta"]) => json_ok(&state.catalog.metadata()?),
        ("GET", ["properties", "stats"]) => json_ok(&state.catalog.statistics()?),
        ("GET", ["properties", id]) => get_property(state, id),

        ("GET", ["properties", id, "shares"]) => property_shares(state, id, &params),
        ("POST", ["properties", id, "purchase"]) => {
            let body = read_body(req)?;
            purchase_shares(state, id, &body)
        }
        ("GET", ["portfolio", owner]) => portfolio(state, owner),

        ("POST", ["chat"]) => {
            let body = read_body(req)?;
            chat(state, &body)
        }

        ("POST", ["admin", "reload"]) => {
            let count = state.catalog.reload()?;
            json_ok(&json!({ "totalProperties": count }))
        }
        ("POST", ["admin", "properties", id, "sales"]) => {
            let body = read_body(req)?;
            set_sales(state, id, &body)
        }

        (_, segments) if is_known_route(segments) => Err(ServerError::MethodNotAllowed),
        _ => Err(ServerError::NotFound(format!("no route for {path}"))),
    }
}

fn is_known_route(segments: &[&str]) -> bool {
    matches!(
        segments,
        ["health"]
            | ["properties"]
            | ["properties", _]
            | ["properties", _, "shares" | "purchase"]
            | ["portfolio", _]
            | ["chat"]
            | ["admin", "reload"]
            | ["admin", "properties", _, "sales"]
    )
}

fn list_properties(state: &AppState, params: &HashMap<String, String>) -> ResultResp {
    let (filter, page) = parse_list_query(params)?;
    json_ok(&state.catalog.list(&filter, page)?)
}

fn get_property(state: &AppState, id: &str) -> ResultResp {
    match state.catalog.get_by_id(id)? {
        Some(record) => json_ok(&record),
        None => Err(ServerError::NotFound("Property not found".into())),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SharesView {
    #[serde(flatten)]
    supply: ShareSupply,
    /// e.g. "20.0000 ETH ($50000)"
    price_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    balance: Option<u64>,
}

/// Supply of a catalog property. Properties nobody has bought into yet are
/// quoted with their opening supply and left untokenized. With `?owner=` the
/// owner's balance is included.
fn property_shares(state: &AppState, id: &str, params: &HashMap<String, String>) -> ResultResp {
    let record = state
        .catalog
        .get_by_id(id)?
        .ok_or_else(|| ServerError::NotFound("Property not found".into()))?;
    let supply = match state.ledger.supply(id) {
        Some(supply) => supply,
        None => offering(&record)?,
    };

    let balance = params
        .get("owner")
        .filter(|o| !o.is_empty())
        .map(|owner| state.ledger.balance(id, owner));

    json_ok(&SharesView {
        supply,
        price_display: format_eth_with_fiat(record.price, &record.currency),
        balance,
    })
}

#[derive(Debug, Deserialize)]
struct PurchaseRequest {
    buyer: Option<String>,
    quantity: Option<u64>,
}

fn purchase_shares(state: &AppState, id: &str, body: &str) -> ResultResp {
    let request: PurchaseRequest = serde_json::from_str(body)
        .map_err(|e| ServerError::BadRequest(format!("invalid JSON body: {e}")))?;

    let buyer = request
        .buyer
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
        .ok_or_else(|| ServerError::BadRequest("buyer is required".into()))?;
    let quantity = request
        .quantity
        .ok_or_else(|| ServerError::BadRequest("quantity is required".into()))?;

    let record = state
        .catalog
        .get_by_id(id)?
        .ok_or_else(|| ServerError::NotFound("Property not found".into()))?;
    state.ledger.tokenize(&record)?;

    let purchase = state.ledger.purchase(id, &buyer, quantity)?;
    tracing::info!(
        property_id = %id,
        buyer = %buyer,
        quantity,
        "shares purchased"
    );
    json_ok(&purchase)
}

#[derive(Debug, Deserialize)]
struct SalesRequest {
    active: Option<bool>,
}

/// Opens or closes share sales for a catalog property.
fn set_sales(state: &AppState, id: &str, body: &str) -> ResultResp {
    let request: SalesRequest = serde_json::from_str(body)
        .map_err(|e| ServerError::BadRequest(format!("invalid JSON body: {e}")))?;
    let active = request
        .active
        .ok_or_else(|| ServerError::BadRequest("active is required".into()))?;

    let record = state
        .catalog
        .get_by_id(id)?
        .ok_or_else(|| ServerError::NotFound("Property not found".into()))?;
    state.ledger.tokenize(&record)?;

    let supply = state.ledger.set_active(id, active)?;
    tracing::info!(property_id = %id, active, "share sales updated");
    json_ok(&supply)
}

#[derive(Debug, Serialize)]
struct PortfolioEntry {
    #[serde(flatten)]
    holding: Holding,
    title: Option<String>,
}

fn portfolio(state: &AppState, owner: &str) -> ResultResp {
    let catalog = state.catalog.catalog()?;
    let holdings: Vec<PortfolioEntry> = state
        .ledger
        .holdings(owner)
        .into_iter()
        .map(|holding| PortfolioEntry {
            title: catalog.find(&holding.property_id).map(|r| r.title.clone()),
            holding,
        })
        .collect();

    json_ok(&json!({ "owner": owner, "holdings": holdings }))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: Option<String>,
    #[serde(rename = "chatHistory")]
    chat_history: Option<Vec<ChatTurn>>,
}

fn chat(state: &AppState, body: &str) -> ResultResp {
    let request: ChatRequest = serde_json::from_str(body)
        .map_err(|e| ServerError::BadRequest(format!("invalid JSON body: {e}")))?;

    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ServerError::BadRequest("Message is required".into()))?;

    let provider = state
        .chat
        .as_ref()
        .ok_or_else(|| ServerError::Unavailable("Chat assistant is not configured".into()))?;

    let history = request.chat_history.unwrap_or_default();
    let reply = provider.reply(&message, &history)?;

    json_ok(&json!({ "reply": reply }))
}

fn read_body(req: Request) -> Result<String, ServerError> {
    let mut body = String::new();
    req.into_body()
        .reader()
        .take(MAX_BODY_BYTES)
        .read_to_string(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("failed to read body: {e}")))?;
    Ok(body)
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}
