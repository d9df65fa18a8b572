//! Request assembly: path, query string, URI and body.
//!
//! Nothing here touches the network. Given an endpoint, validated arguments
//! and a resolved address, `build` produces the exact `HttpRequest` a
//! transport should execute.

use serde_json::{Map, Value as Json};

use crate::address::ResolvedAddress;
use crate::args::{CallArguments, Options, PathArgs};
use crate::endpoint::{BodyKind, Endpoint};
use crate::http::HttpRequest;

const CONTENT_TYPE: &str = "content-type";
const FORM: &str = "application/x-www-form-urlencoded";
const JSON: &str = "application/json";

/// `/{action}` followed by every present path value, then `suffix`.
///
/// Path values are written as formatted, without percent-encoding. A check
/// named `HTTP Port 80` must be passed as `HTTP%20Port%2080`.
pub fn build_path(action: &str, path: &PathArgs, suffix: Option<&str>) -> String {
    std::iter::once(format!("/{action}"))
        .chain(path.values().map(|value| value.format()))
        .chain(suffix.map(str::to_string))
        .collect::<Vec<_>>()
        .join("/")
}

/// Percent-encoded `key=value` pairs in insertion order, or `None` when there
/// are no options.
pub fn build_query(options: &Options) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let pairs: Vec<String> = options
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&value.format())
            )
        })
        .collect();
    Some(pairs.join("&"))
}

pub fn build_uri(resolved: &ResolvedAddress, path: &str, query: Option<&str>) -> String {
    match query {
        Some(query) => format!("{resolved}{path}?{query}"),
        None => format!("{resolved}{path}"),
    }
}

/// Options rendered as a flat JSON object of strings.
fn options_object(options: &Options) -> Json {
    let map: Map<String, Json> = options
        .iter()
        .map(|(key, value)| (key.to_string(), Json::String(value.format())))
        .collect();
    Json::Object(map)
}

/// Assembles the request for `endpoint`.
///
/// `payload`, when given, is the JSON body of a `BodyKind::Json` endpoint;
/// without it the query mapping is sent as a JSON object.
pub fn build(
    endpoint: &Endpoint,
    args: &CallArguments,
    resolved: &ResolvedAddress,
    payload: Option<&Json>,
) -> Result<HttpRequest, serde_json::Error> {
    let path = build_path(endpoint.action, &args.path, endpoint.suffix);
    let query = build_query(&args.query);

    let (uri, headers, body) = match endpoint.body {
        BodyKind::None => (build_uri(resolved, &path, query.as_deref()), Vec::new(), None),
        BodyKind::Form => (
            build_uri(resolved, &path, None),
            vec![(CONTENT_TYPE.to_string(), FORM.to_string())],
            Some(query.unwrap_or_default()),
        ),
        BodyKind::Json => {
            let body = match payload {
                Some(payload) => serde_json::to_string(payload)?,
                None => serde_json::to_string(&options_object(&args.query))?,
            };
            (
                build_uri(resolved, &path, None),
                vec![(CONTENT_TYPE.to_string(), JSON.to_string())],
                Some(body),
            )
        }
    };

    Ok(HttpRequest {
        method: endpoint.method,
        uri,
        headers,
        body,
    })
}
