use serde_json::Value;

use genchat_types::{FileArtifact, Message};

/// Field names the service uses for a file entry's path
const NAME_KEYS: [&str; 2] = ["name", "fileName"];

/// Field names the service uses for a file entry's body
const CONTENT_KEYS: [&str; 3] = ["content", "source", "code"];

/// Scan the messages of a chat for embedded file entries.
///
/// The entry format is whatever the service put into the structured
/// content; this is a passthrough scan, not a schema. Within one message,
/// duplicate names collapse with the last occurrence winning; order
/// otherwise follows discovery order.
pub fn extract_files(messages: &[Message]) -> Vec<FileArtifact> {
    let mut artifacts: Vec<FileArtifact> = Vec::new();

    for message in messages {
        let Some(value) = &message.structured_content else {
            continue;
        };

        let mut found = Vec::new();
        collect_entries(value, &mut found);

        let mut deduped: Vec<FileArtifact> = Vec::new();
        for file in found {
            if let Some(existing) = deduped.iter_mut().find(|f| f.name == file.name) {
                existing.content = file.content;
            } else {
                deduped.push(file);
            }
        }
        artifacts.extend(deduped);
    }

    artifacts
}

fn collect_entries(value: &Value, out: &mut Vec<FileArtifact>) {
    match value {
        Value::Object(map) => {
            if let Some(file) = file_entry(map) {
                out.push(file);
                return;
            }
            for child in map.values() {
                collect_entries(child, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_entries(item, out);
            }
        }
        _ => {}
    }
}

/// An object is a file entry when it carries both a path-like name string
/// and a content string under the service's known field names.
fn file_entry(map: &serde_json::Map<String, Value>) -> Option<FileArtifact> {
    let name = NAME_KEYS
        .iter()
        .find_map(|k| map.get(*k).and_then(Value::as_str))
        .or_else(|| {
            map.get("meta")
                .and_then(|m| m.get("file"))
                .and_then(Value::as_str)
        })?;
    let content = CONTENT_KEYS
        .iter()
        .find_map(|k| map.get(*k).and_then(Value::as_str))?;

    let name = sanitize_name(name)?;
    Some(FileArtifact {
        name,
        content: content.to_string(),
    })
}

/// Normalise an entry path and refuse anything that could escape the
/// archive root.
fn sanitize_name(raw: &str) -> Option<String> {
    let mut name = raw.trim().replace('\\', "/");
    loop {
        let stripped = name
            .strip_prefix("./")
            .or_else(|| name.strip_prefix('/'))
            .map(str::to_string);
        match stripped {
            Some(s) => name = s,
            None => break,
        }
    }
    if name.is_empty() || name.split('/').any(|part| part == "..") {
        return None;
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use genchat_types::Role;

    fn message_with(structured: serde_json::Value) -> Message {
        Message {
            id: "m".to_string(),
            role: Role::Assistant,
            content: "generated".to_string(),
            structured_content: Some(structured),
        }
    }

    #[test]
    fn finds_files_across_messages() {
        let messages = vec![
            message_with(serde_json::json!({
                "files": [
                    { "name": "app/page.tsx", "content": "export default function Page() {}" },
                    { "name": "app/layout.tsx", "content": "export default function Layout() {}" }
                ]
            })),
            message_with(serde_json::json!([
                { "meta": { "file": "lib/utils.ts" }, "source": "export const noop = () => {}" }
            ])),
        ];

        let files = extract_files(&messages);
        assert_eq!(files.len(), 3);
        assert_eq!(files[0].name, "app/page.tsx");
        assert_eq!(files[1].name, "app/layout.tsx");
        assert_eq!(files[2].name, "lib/utils.ts");
        assert_eq!(files[2].content, "export const noop = () => {}");
    }

    #[test]
    fn no_structured_content_yields_nothing() {
        let messages = vec![Message {
            id: "m1".to_string(),
            role: Role::User,
            content: "plain text only".to_string(),
            structured_content: None,
        }];
        assert!(extract_files(&messages).is_empty());
    }

    #[test]
    fn structured_content_without_files_yields_nothing() {
        let messages = vec![message_with(serde_json::json!({
            "thinking": "no artifacts here",
            "steps": [1, 2, 3]
        }))];
        assert!(extract_files(&messages).is_empty());
    }

    #[test]
    fn duplicate_names_in_one_message_last_wins() {
        let messages = vec![message_with(serde_json::json!({
            "files": [
                { "name": "index.ts", "content": "first" },
                { "name": "index.ts", "content": "second" }
            ]
        }))];

        let files = extract_files(&messages);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].content, "second");
    }

    #[test]
    fn traversal_and_empty_names_are_dropped() {
        let messages = vec![message_with(serde_json::json!({
            "files": [
                { "name": "../escape.ts", "content": "nope" },
                { "name": "", "content": "nope" },
                { "name": "/srv/abs.ts", "content": "kept relative" },
                { "name": "./ok.ts", "content": "kept" }
            ]
        }))];

        let files = extract_files(&messages);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "srv/abs.ts");
        assert_eq!(files[1].name, "ok.ts");
    }

    #[test]
    fn backslash_paths_are_normalised() {
        let messages = vec![message_with(serde_json::json!({
            "name": "components\\ui\\button.tsx",
            "content": "export const Button = null"
        }))];

        let files = extract_files(&messages);
        assert_eq!(files[0].name, "components/ui/button.tsx");
    }
}
