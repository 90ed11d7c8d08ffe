use crate::error::{AppError, Result};
use crate::extract::ClientKey;
use crate::model::{CreateUrlRequest, CreateUrlResponse, RedirectQuery};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Redirect;
use axum::Json;
use burrow_core::{RedirectKind, UrlRecord};
use burrow_shortener::ShortenOptions;
use jiff::SignedDuration;

const CUSTOM_HEADER: &str = "custom";
const PASS_HEADER: &str = "pass";
const TTL_HEADER: &str = "ttl";

pub async fn usage_handler(State(state): State<AppState>) -> String {
    format!(
        "curl {} -d \"http://longlonglong.com/long/long/long?a=1&b=2\"\n",
        state.domain()
    )
}

/// `POST /`: the body is the long URL, options ride in headers.
pub async fn shorten_raw_handler(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    headers: HeaderMap,
    body: String,
) -> Result<String> {
    state.limiter().check(&client)?;

    let options = ShortenOptions {
        custom_code: header(&headers, CUSTOM_HEADER)?,
        ttl: header(&headers, TTL_HEADER)?
            .filter(|raw| !raw.is_empty())
            .map(|raw| parse_ttl(&raw))
            .transpose()?,
        password: header(&headers, PASS_HEADER)?,
    };

    let record = state.shortener().shorten(&body, options).await?;
    Ok(format!("{}\n", record.short_code().to_url(state.domain())))
}

/// `POST /api/v1/urls`
pub async fn create_url_handler(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    Json(request): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<CreateUrlResponse>)> {
    state.limiter().check(&client)?;

    let options = ShortenOptions {
        custom_code: request.custom_code,
        ttl: request.ttl.as_deref().map(parse_ttl).transpose()?,
        password: request.password,
    };

    let record = state
        .shortener()
        .shorten(&request.original_url, options)
        .await?;
    Ok((StatusCode::CREATED, Json(to_response(&record, state.domain()))))
}

/// `GET /{code}`
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<RedirectQuery>,
    headers: HeaderMap,
) -> Result<Redirect> {
    let password = match header(&headers, PASS_HEADER)? {
        Some(password) => Some(password),
        None => query.pass,
    };

    let record = state
        .shortener()
        .restore(&code, password.as_deref())
        .await?;

    Ok(match record.redirect_kind() {
        RedirectKind::Temporary => Redirect::temporary(record.original_url()),
        RedirectKind::Permanent => Redirect::permanent(record.original_url()),
    })
}

fn header(headers: &HeaderMap, name: &'static str) -> Result<Option<String>> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(|v| v.trim().to_string())
                .map_err(|_| AppError::InvalidHeader(name))
        })
        .transpose()
}

/// Accepts the friendly (`1h30m`) and ISO 8601 (`PT1H30M`) duration forms.
fn parse_ttl(raw: &str) -> Result<SignedDuration> {
    raw.trim()
        .parse::<SignedDuration>()
        .map_err(|e| AppError::InvalidTtl {
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

fn to_response(record: &UrlRecord, domain: &str) -> CreateUrlResponse {
    CreateUrlResponse {
        short_code: record.short_code().to_string(),
        short_url: record.short_code().to_url(domain),
        original_url: record.original_url().to_string(),
        expire_at: record.expire_at(),
    }
}
