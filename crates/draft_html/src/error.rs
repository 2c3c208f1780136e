// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

/// Failures while turning markup into a content state.
///
/// Malformed HTML is never an error; the parser recovers from it. Only an
/// entity element whose payload cannot be read aborts the import.
#[derive(Debug, thiserror::Error)]
pub enum HtmlImportError {
    #[error("<{tag}> entity element has no data-value attribute")]
    MissingEntityData { tag: String },
    #[error("<{tag}> entity element has an unreadable data-value: {source}")]
    InvalidEntityData {
        tag: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while converting to or from the raw JSON document form.
#[derive(Debug, thiserror::Error)]
pub enum RawContentError {
    #[error("invalid raw content: {0}")]
    Json(#[from] serde_json::Error),
    #[error("entity {key} has unreadable data: {source}")]
    InvalidEntityData {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("block {block} refers to unknown entity {key}")]
    UnknownEntity { block: String, key: String },
    #[error("block {block} has a range outside its text")]
    RangeOutOfBounds { block: String },
}
