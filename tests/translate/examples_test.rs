//! Worked translation examples, input document to policy records.

use netpolgen::model::{parse_document, Service, ServiceEntry};
use netpolgen::policy::{PolicyPort, PolicyType, PortGroup, PortValue};
use netpolgen::translate::{assemble, translate, PortMode};

fn tcp_group(port: u16) -> PortGroup {
    PortGroup {
        ports: vec![PolicyPort {
            port: PortValue::Number(port),
            protocol: "TCP".to_owned(),
        }],
    }
}

#[test]
fn web_service_merges_entries_into_one_policy() {
    let json = r#"{"services": [{
        "display_name": "Web Service",
        "service_entries": [
            {"l4_protocol": "TCP", "destination_ports": ["80"]},
            {"l4_protocol": "TCP", "destination_ports": ["443"]}
        ]
    }]}"#;
    let document = parse_document(json).expect("should parse");
    let translation = translate(&document, "custom-namespace", PortMode::Numeric);

    assert_eq!(translation.policies.len(), 1);
    let policy = &translation.policies[0];
    assert_eq!(policy.metadata.name, "web-service");
    assert_eq!(policy.metadata.namespace, "custom-namespace");
    assert_eq!(policy.spec.policy_types, vec![PolicyType::Ingress]);
    assert_eq!(policy.spec.ingress, vec![tcp_group(80), tcp_group(443)]);
    assert!(policy.spec.egress.is_empty());
    assert!(translation.is_clean());
}

#[test]
fn disallowed_runs_collapse_in_policy_name() {
    let assembly = assemble(&Service::new("A!! B__C", Vec::new()), "default", PortMode::Numeric);
    assert_eq!(assembly.policy.metadata.name, "a-b-c");
    assert_eq!(
        assembly.policy.spec.pod_selector.match_labels.get("app"),
        Some(&"a-b-c".to_owned())
    );
}

#[test]
fn malformed_port_is_dropped_with_one_diagnostic() {
    let service = Service::new(
        "Legacy App",
        vec![ServiceEntry::new("HTTP-ALT", "TCP").with_destination_ports(["80", "abc"])],
    );
    let assembly = assemble(&service, "default", PortMode::Numeric);

    assert_eq!(assembly.policy.spec.ingress, vec![tcp_group(80)]);
    assert_eq!(assembly.diagnostics.len(), 1);
    let diagnostic = &assembly.diagnostics[0];
    assert_eq!(diagnostic.service, "Legacy App");
    assert_eq!(diagnostic.entry, "HTTP-ALT");
    assert_eq!(diagnostic.token, "abc");
    assert!(diagnostic.to_string().contains("'abc'"));
}

#[test]
fn empty_entries_give_empty_policy_types() {
    let document = parse_document(r#"{"services": [{"display_name": "Idle"}]}"#)
        .expect("should parse");
    let translation = translate(&document, "default", PortMode::Numeric);
    let policy = &translation.policies[0];
    assert!(policy.spec.policy_types.is_empty());
    assert!(policy.spec.ingress.is_empty());
    assert!(policy.spec.egress.is_empty());
    assert!(policy.is_degenerate());
}

#[test]
fn diagnostics_follow_input_order_across_services() {
    let document = parse_document(
        r#"{"services": [
            {"display_name": "one", "service_entries": [
                {"display_name": "a", "l4_protocol": "TCP", "destination_ports": ["x"]}
            ]},
            {"display_name": "two", "service_entries": [
                {"display_name": "b", "l4_protocol": "UDP", "source_ports": ["y", "53"]}
            ]}
        ]}"#,
    )
    .expect("should parse");
    let translation = translate(&document, "default", PortMode::Numeric);

    let tokens: Vec<_> = translation
        .diagnostics
        .iter()
        .map(|d| (d.service.as_str(), d.direction, d.token.as_str()))
        .collect();
    assert_eq!(
        tokens,
        vec![
            ("one", PolicyType::Ingress, "x"),
            ("two", PolicyType::Egress, "y"),
        ]
    );
    // "one" lost its only port, so it has no rules at all.
    assert!(translation.policies[0].is_degenerate());
    assert_eq!(translation.policies[1].spec.policy_types, vec![PolicyType::Egress]);
}

#[test]
fn passthrough_mode_keeps_named_ports() {
    let service = Service::new(
        "api",
        vec![ServiceEntry::new("named", "TCP").with_destination_ports(["http", "8443"])],
    );
    let assembly = assemble(&service, "default", PortMode::Passthrough);
    let ports: Vec<_> = assembly.policy.spec.ingress[0]
        .ports
        .iter()
        .map(|p| p.port.clone())
        .collect();
    assert_eq!(
        ports,
        vec![
            PortValue::Name("http".to_owned()),
            PortValue::Name("8443".to_owned())
        ]
    );
    assert!(assembly.diagnostics.is_empty());
}
