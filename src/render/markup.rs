/// `Name` → `ns.Name`; dotted targets are already qualified.
pub fn qualify(namespace: &str, target: &str) -> String {
    if target.contains('.') {
        target.to_string()
    } else {
        format!("{namespace}.{target}")
    }
}

/// Cross-reference placeholder resolved by the documentation site.
pub fn xref(namespace: &str, target: &str, label: Option<&str>) -> String {
    let target = qualify(namespace, target);
    match label {
        Some(label) => format!(r#"{{{{WebExtAPIRef("{target}", "{label}")}}}}"#),
        None => format!(r#"{{{{WebExtAPIRef("{target}")}}}}"#),
    }
}

pub fn code(text: &str) -> String {
    format!("<code>{text}</code>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xref_qualifies_bare_names_only() {
        assert_eq!(xref("alarms", "Alarm", None), r#"{{WebExtAPIRef("alarms.Alarm")}}"#);
        assert_eq!(xref("tabs", "runtime.Port", None), r#"{{WebExtAPIRef("runtime.Port")}}"#);
        assert_eq!(xref("tabs", "Tab", Some("tab")), r#"{{WebExtAPIRef("tabs.Tab", "tab")}}"#);
    }
}
