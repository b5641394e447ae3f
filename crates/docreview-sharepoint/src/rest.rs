//! SharePoint REST endpoints and payloads.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Deserialize;

pub(crate) const ODATA_JSON: &str = "application/json;odata=nometadata";

/// Characters escaped inside the `'...'` literal of a server-relative path. '/' is kept.
const PATH_LITERAL: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Deserialize)]
pub(crate) struct ODataList<T> {
    pub value: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct NamedItem {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WebInfo {
    pub title: String,
}

/// Quote a server-relative path as an OData string literal body.
fn path_literal(path: &str) -> String {
    utf8_percent_encode(&path.replace('\'', "''"), PATH_LITERAL).to_string()
}

pub(crate) fn web_url(site: &str) -> String {
    format!("{site}/_api/web?$select=Title")
}

/// `collection` is `Folders` or `Files`.
pub(crate) fn folder_children_url(site: &str, path: &str, collection: &str) -> String {
    format!(
        "{site}/_api/web/GetFolderByServerRelativeUrl('{}')/{collection}?$select=Name",
        path_literal(path)
    )
}

pub(crate) fn file_content_url(site: &str, path: &str) -> String {
    format!(
        "{site}/_api/web/GetFileByServerRelativeUrl('{}')/$value",
        path_literal(path)
    )
}

pub(crate) fn parse_names(body: &[u8]) -> Result<Vec<String>, serde_json::Error> {
    let list: ODataList<NamedItem> = serde_json::from_slice(body)?;
    Ok(list.value.into_iter().map(|item| item.name).collect())
}
