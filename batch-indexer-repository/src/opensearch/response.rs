//! Bulk response parsing.
//!
//! The `_bulk` endpoint reports per-item status inside an overall 200
//! response, so success has to be judged item by item and folded into a
//! `LoadReport` rather than a single pass/fail.

use serde_json::Value;

use crate::errors::SinkError;
use batch_indexer_shared::{DocumentFailure, LoadReport};

/// Fold a `_bulk` response body into a per-document report.
pub(crate) fn parse_bulk_response(body: &Value) -> Result<LoadReport, SinkError> {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SinkError::invalid_response("bulk response has no items array"))?;

    let mut report = LoadReport {
        total: items.len(),
        ..LoadReport::default()
    };

    for item in items {
        // Upserts are submitted as `index` actions; `create` is accepted
        // too so the parser works against either action type.
        let action = item
            .get("index")
            .or_else(|| item.get("create"))
            .ok_or_else(|| SinkError::invalid_response("bulk item has no action object"))?;

        let id = action
            .get("_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let status = action.get("status").and_then(Value::as_u64).unwrap_or(0);

        if (200..300).contains(&status) {
            report.succeeded.push(id);
        } else {
            let reason = action
                .pointer("/error/reason")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            report.failures.push(DocumentFailure { id, reason });
        }
    }

    Ok(report)
}
