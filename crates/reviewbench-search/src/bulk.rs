use serde::Serialize;

/// Build a `_bulk` body: one `index` action line and one source line per
/// document, each terminated by `\n` (the trailing newline is required).
pub fn index_body<'a, T, I>(index: &str, docs: I) -> Result<String, serde_json::Error>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = (&'a str, &'a T)>,
{
    let mut body = String::new();
    for (id, doc) in docs {
        let action = serde_json::json!({ "index": { "_index": index, "_id": id } });
        body.push_str(&serde_json::to_string(&action)?);
        body.push('\n');
        body.push_str(&serde_json::to_string(doc)?);
        body.push('\n');
    }
    Ok(body)
}
