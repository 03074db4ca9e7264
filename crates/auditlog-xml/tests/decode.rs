use auditlog_xml::{decode_str, Address, DecodeContext, Location, SchemaVersion, XmlError};
use mgmt_model::Value;
use pretty_assertions::assert_eq;

fn doc(version: SchemaVersion, body: &str) -> String {
    format!(
        "<audit-log xmlns=\"{}\">\n{body}\n</audit-log>",
        version.namespace_uri()
    )
}

fn decode(version: SchemaVersion, body: &str) -> Result<Vec<auditlog_xml::Operation>, XmlError> {
    let context = DecodeContext::new(version, Address::root());
    decode_str(&doc(version, body), &context)
}

fn decode_host(
    version: SchemaVersion,
    body: &str,
) -> Result<Vec<auditlog_xml::Operation>, XmlError> {
    let context = DecodeContext::new(version, Address::root()).with_host(true);
    decode_str(&doc(version, body), &context)
}

fn audit() -> Address {
    Address::root().append("access", "audit")
}

fn addresses(operations: &[auditlog_xml::Operation]) -> Vec<String> {
    operations.iter().map(|op| op.address.to_string()).collect()
}

const TLS_SYSLOG: &str = r#"<handlers>
    <syslog-handler name="remote" formatter="json" syslog-format="RFC3164" max-length="2048" truncate="TRUE">
        <tls host="logs.example.com" port="6514" message-transfer="OCTET_COUNTING">
            <truststore path="trust.jks" relative-to="jboss.server.config.dir" keystore-password="changeit"/>
            <client-cert-store path="client.jks" keystore-password="changeit" key-password="secret"/>
        </tls>
    </syslog-handler>
</handlers>"#;

#[test]
fn decodes_subsystem_in_document_order() {
    let body = r#"<formatters>
    <json-formatter name="json" compact="true" date-separator=" | "/>
</formatters>
<handlers>
    <file-handler name="file" formatter="json" path="audit.log" relative-to="jboss.server.data.dir"/>
</handlers>
<logger log-boot="false">
    <handlers>
        <handler name="file"/>
    </handlers>
</logger>"#;
    let operations = decode(SchemaVersion::V1_5, body).unwrap();
    assert_eq!(
        addresses(&operations),
        vec![
            "/access=audit",
            "/access=audit/json-formatter=json",
            "/access=audit/file-handler=file",
            "/access=audit/logger=audit-log",
            "/access=audit/logger=audit-log/handler=file",
        ]
    );
    let formatter = &operations[1];
    assert_eq!(formatter.parameter("compact"), Some(&Value::Boolean(true)));
    assert_eq!(formatter.parameter("date-separator"), Some(&Value::from(" | ")));
    assert_eq!(formatter.parameter("name"), None);
    let handler = &operations[2];
    assert_eq!(handler.parameter("formatter"), Some(&Value::from("json")));
    assert_eq!(handler.parameter("path"), Some(&Value::from("audit.log")));
    assert_eq!(handler.parameters.len(), 3);
    assert!(operations[4].parameters.is_empty());
}

#[test]
fn operations_live_under_the_base_address() {
    let base: Address = "host=primary".parse().unwrap();
    let context = DecodeContext::new(SchemaVersion::V1_5, base.clone());
    let xml = doc(SchemaVersion::V1_5, "<logger/>");
    let operations = decode_str(&xml, &context).unwrap();
    assert_eq!(
        addresses(&operations),
        vec![
            "/host=primary/access=audit",
            "/host=primary/access=audit/logger=audit-log",
        ]
    );
    assert!(operations.iter().all(|op| op.address.starts_with(&base)));
}

#[test]
fn tls_protocol_with_both_key_stores() {
    let operations = decode(SchemaVersion::V1_5, TLS_SYSLOG).unwrap();
    let tls = audit().append("syslog-handler", "remote").append("protocol", "tls");
    assert_eq!(
        addresses(&operations)[1..].to_vec(),
        vec![
            "/access=audit/syslog-handler=remote".to_string(),
            tls.to_string(),
            tls.append("authentication", "truststore").to_string(),
            tls.append("authentication", "client-cert-store").to_string(),
        ]
    );
    assert_eq!(operations[1].parameter("truncate"), Some(&Value::Boolean(true)));
    assert_eq!(operations[1].parameter("max-length"), Some(&Value::Integer(2048)));
    assert_eq!(operations[2].parameter("port"), Some(&Value::Integer(6514)));
    assert_eq!(
        operations[4].parameter("key-password"),
        Some(&Value::from("secret"))
    );
}

#[test]
fn two_protocols_conflict() {
    for (first, second) in [("udp", "tcp"), ("tcp", "tls"), ("tls", "udp"), ("udp", "udp")] {
        let body = format!(
            r#"<handlers>
    <syslog-handler name="s" formatter="json">
        <{first}/>
        <{second}/>
    </syslog-handler>
</handlers>"#
        );
        let err = decode(SchemaVersion::V1_5, &body).unwrap_err();
        assert_eq!(
            err,
            XmlError::ConflictingVariant {
                slot: "protocol".into(),
                element: second.into(),
                location: Location { line: 5, column: 9 },
            },
            "{first} then {second}"
        );
    }
}

#[test]
fn second_truststore_is_a_duplicate_child() {
    let body = r#"<handlers>
    <syslog-handler name="s" formatter="json">
        <tls>
            <truststore path="a.jks" keystore-password="x"/>
            <truststore path="b.jks" keystore-password="y"/>
        </tls>
    </syslog-handler>
</handlers>"#;
    let err = decode(SchemaVersion::V1_5, body).unwrap_err();
    assert!(
        matches!(err, XmlError::DuplicateChild { ref element, .. } if element == "truststore"),
        "{err}"
    );
}

#[test]
fn second_client_cert_store_is_a_duplicate_child() {
    let body = r#"<handlers>
    <syslog-handler name="s" formatter="json">
        <tls>
            <client-cert-store path="a.jks" keystore-password="x"/>
            <truststore path="t.jks" keystore-password="x"/>
            <client-cert-store path="b.jks" keystore-password="y"/>
        </tls>
    </syslog-handler>
</handlers>"#;
    let err = decode(SchemaVersion::V1_5, body).unwrap_err();
    assert_eq!(
        err,
        XmlError::DuplicateChild {
            element: "client-cert-store".into(),
            location: Location { line: 7, column: 13 },
        }
    );
}

#[test]
fn key_stores_are_only_legal_under_tls() {
    let body = r#"<handlers>
    <syslog-handler name="s" formatter="json">
        <tcp>
            <truststore path="a.jks" keystore-password="x"/>
        </tcp>
    </syslog-handler>
</handlers>"#;
    let err = decode(SchemaVersion::V1_5, body).unwrap_err();
    assert!(matches!(err, XmlError::ContentNotAllowed { ref element, .. } if element == "tcp"));
}

#[test]
fn syslog_identity_needs_a_later_family() {
    let body = r#"<handlers>
    <syslog-handler name="s" formatter="json" facility="LOCAL_USE_3" app-name="server">
        <udp/>
    </syslog-handler>
</handlers>"#;
    let err = decode(SchemaVersion::V1_5, body).unwrap_err();
    assert!(
        matches!(
            err,
            XmlError::UnexpectedAttribute { ref attribute, .. } if attribute == "facility"
        ),
        "{err}"
    );

    for version in [SchemaVersion::V1_6, SchemaVersion::V2_2, SchemaVersion::V3_0] {
        let operations = decode(version, body).unwrap();
        assert_eq!(
            operations[1].parameter("facility"),
            Some(&Value::from("LOCAL_USE_3"))
        );
        assert_eq!(operations[1].parameter("app-name"), Some(&Value::from("server")));
    }
}

#[test]
fn message_transfer_is_rejected_on_udp() {
    let body = r#"<handlers>
    <syslog-handler name="s" formatter="json">
        <udp message-transfer="OCTET_COUNTING"/>
    </syslog-handler>
</handlers>"#;
    let err = decode(SchemaVersion::V3_0, body).unwrap_err();
    assert_eq!(
        err,
        XmlError::UnexpectedAttribute {
            element: "udp".into(),
            attribute: "message-transfer".into(),
            location: Location { line: 4, column: 9 },
        }
    );
}

#[test]
fn reconnect_timeout_needs_the_rotating_family() {
    let body = r#"<handlers>
    <syslog-handler name="s" formatter="json">
        <tcp reconnect-timeout="15"/>
    </syslog-handler>
</handlers>"#;
    assert!(matches!(
        decode(SchemaVersion::V2_0, body),
        Err(XmlError::UnexpectedAttribute { .. })
    ));
    let operations = decode(SchemaVersion::V1_7, body).unwrap();
    assert_eq!(
        operations[2].parameter("reconnect-timeout"),
        Some(&Value::Integer(15))
    );
}

#[test]
fn rotating_handlers_need_the_rotating_family() {
    let body = r#"<handlers>
    <size-rotating-file-handler name="sized" formatter="json" path="a.log" rotate-size="5m" max-backup-index="3"/>
    <periodic-rotating-file-handler name="daily" formatter="json" path="b.log" suffix=".yyyy-MM-dd"/>
</handlers>"#;
    let err = decode(SchemaVersion::V2_2, body).unwrap_err();
    assert!(
        matches!(
            err,
            XmlError::UnexpectedElement { ref element, .. } if element == "size-rotating-file-handler"
        )
    );
    let operations = decode(SchemaVersion::V3_0, body).unwrap();
    assert_eq!(operations[1].parameter("rotate-size"), Some(&Value::from("5m")));
    assert_eq!(operations[1].parameter("max-backup-index"), Some(&Value::Integer(3)));
    assert_eq!(operations[2].parameter("suffix"), Some(&Value::from(".yyyy-MM-dd")));
}

#[test]
fn server_logger_is_host_only() {
    let body = r#"<logger/>
<server-logger log-read-only="true">
    <handlers>
        <handler name="file"/>
    </handlers>
</server-logger>"#;
    let err = decode(SchemaVersion::V1_5, body).unwrap_err();
    assert_eq!(
        err,
        XmlError::UnexpectedElement {
            element: "server-logger".into(),
            location: Location { line: 3, column: 1 },
        }
    );

    let operations = decode_host(SchemaVersion::V1_5, body).unwrap();
    assert_eq!(
        addresses(&operations),
        vec![
            "/access=audit",
            "/access=audit/logger=audit-log",
            "/access=audit/server-logger=audit-log",
            "/access=audit/server-logger=audit-log/handler=file",
        ]
    );
    assert_eq!(operations[2].parameter("log-read-only"), Some(&Value::Boolean(true)));
}

#[test]
fn loggers_are_singletons() {
    let err = decode(SchemaVersion::V1_5, "<logger/>\n<logger/>").unwrap_err();
    assert!(matches!(err, XmlError::DuplicateChild { ref element, .. } if element == "logger"));
}

#[test]
fn server_logger_is_a_singleton() {
    let body = r#"<server-logger/>
<logger/>
<server-logger enabled="false"/>"#;
    let err = decode_host(SchemaVersion::V1_6, body).unwrap_err();
    assert_eq!(
        err,
        XmlError::DuplicateChild {
            element: "server-logger".into(),
            location: Location { line: 4, column: 1 },
        }
    );
}

#[test]
fn pre_audit_versions_reject_the_subsystem() {
    for version in [SchemaVersion::V1_0, SchemaVersion::V1_4] {
        let err = decode(version, "").unwrap_err();
        assert!(
            matches!(
                err,
                XmlError::UnexpectedElement { ref element, .. } if element == "audit-log"
            ),
            "{version}: {err}"
        );
    }
}

#[test]
fn foreign_namespace_is_rejected() {
    let err = decode(
        SchemaVersion::V1_5,
        r#"<logger xmlns="urn:jboss:domain:1.6"/>"#,
    )
    .unwrap_err();
    assert_eq!(
        err,
        XmlError::NamespaceMismatch {
            element: "logger".into(),
            expected: "urn:jboss:domain:1.5".into(),
            found: "urn:jboss:domain:1.6".into(),
            location: Location { line: 2, column: 1 },
        }
    );

    let context = DecodeContext::new(SchemaVersion::V3_0, Address::root());
    let err = decode_str(&doc(SchemaVersion::V1_7, ""), &context).unwrap_err();
    assert!(matches!(
        err,
        XmlError::NamespaceMismatch { ref element, .. } if element == "audit-log"
    ));

    let err = decode_str("<audit-log/>", &context).unwrap_err();
    assert!(matches!(err, XmlError::NamespaceMismatch { ref found, .. } if found.is_empty()));
}

#[test]
fn unknown_and_misplaced_elements_are_rejected() {
    let err = decode(
        SchemaVersion::V1_5,
        r#"<formatters>
    <file-handler name="f" formatter="json" path="a.log"/>
</formatters>"#,
    )
    .unwrap_err();
    assert_eq!(
        err,
        XmlError::UnexpectedElement {
            element: "file-handler".into(),
            location: Location { line: 3, column: 5 },
        }
    );

    let err = decode(SchemaVersion::V1_5, "<access-control/>").unwrap_err();
    assert!(matches!(err, XmlError::UnexpectedElement { .. }));
}

#[test]
fn attribute_errors() {
    let err = decode(SchemaVersion::V1_5, r#"<logger verbose="true"/>"#).unwrap_err();
    assert!(matches!(
        err,
        XmlError::UnexpectedAttribute { ref attribute, .. } if attribute == "verbose"
    ));

    let err = decode(
        SchemaVersion::V1_5,
        r#"<logger xmlns:x="urn:x" x:enabled="true"/>"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        XmlError::UnexpectedAttribute { ref attribute, .. } if attribute == "enabled"
    ));

    let err = decode(SchemaVersion::V1_5, r#"<logger enabled="yes"/>"#).unwrap_err();
    assert!(
        matches!(err, XmlError::InvalidAttributeValue { ref attribute, ref value, .. }
            if attribute == "enabled" && value == "yes")
    );

    let body = r#"<handlers>
    <syslog-handler name="s" formatter="json">
        <udp port="70000"/>
    </syslog-handler>
</handlers>"#;
    let err = decode(SchemaVersion::V1_5, body).unwrap_err();
    assert!(matches!(
        err,
        XmlError::InvalidAttributeValue { ref attribute, .. } if attribute == "port"
    ));
}

#[test]
fn missing_required_attributes_are_listed_together() {
    let err = decode(
        SchemaVersion::V1_5,
        r#"<handlers>
    <file-handler relative-to="jboss.server.log.dir"/>
</handlers>"#,
    )
    .unwrap_err();
    assert_eq!(
        err,
        XmlError::MissingRequiredAttribute {
            element: "file-handler".into(),
            attributes: vec!["name".into(), "formatter".into(), "path".into()],
            location: Location { line: 3, column: 5 },
        }
    );
}

#[test]
fn duplicate_names_are_rejected() {
    let body = r#"<handlers>
    <file-handler name="f" formatter="json" path="a.log"/>
    <file-handler name="f" formatter="json" path="b.log"/>
</handlers>"#;
    let err = decode(SchemaVersion::V1_5, body).unwrap_err();
    assert!(matches!(err, XmlError::DuplicateName { ref name, .. } if name == "f"));

    let body = r#"<logger>
    <handlers>
        <handler name="f"/>
        <handler name="f"/>
    </handlers>
</logger>"#;
    let err = decode(SchemaVersion::V1_5, body).unwrap_err();
    assert!(matches!(err, XmlError::DuplicateName { ref element, .. } if element == "handler"));
}

#[test]
fn same_name_in_different_kinds_is_fine() {
    let body = r#"<formatters>
    <json-formatter name="audit"/>
</formatters>
<handlers>
    <file-handler name="audit" formatter="audit" path="a.log"/>
    <syslog-handler name="audit" formatter="audit"/>
</handlers>"#;
    assert_eq!(decode(SchemaVersion::V1_5, body).unwrap().len(), 4);
}

#[test]
fn leaves_must_be_empty() {
    let err = decode(
        SchemaVersion::V1_5,
        r#"<formatters>
    <json-formatter name="json">compact</json-formatter>
</formatters>"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        XmlError::ContentNotAllowed { ref element, .. } if element == "json-formatter"
    ));

    let err = decode(
        SchemaVersion::V1_5,
        r#"<logger>
    <handlers>
        <handler name="f"><handler name="g"/></handler>
    </handlers>
</logger>"#,
    )
    .unwrap_err();
    assert!(matches!(err, XmlError::ContentNotAllowed { ref element, .. } if element == "handler"));
}

#[test]
fn grouping_blocks_take_no_attributes() {
    let err = decode(SchemaVersion::V1_5, r#"<handlers default="f"/>"#).unwrap_err();
    assert!(matches!(
        err,
        XmlError::UnexpectedAttribute { ref element, .. } if element == "handlers"
    ));
}

#[test]
fn trailing_content_after_the_root_is_rejected() {
    let context = DecodeContext::new(SchemaVersion::V1_5, Address::root());
    let xml = format!("{}\n<logger/>", doc(SchemaVersion::V1_5, ""));
    let err = decode_str(&xml, &context).unwrap_err();
    assert!(matches!(err, XmlError::UnexpectedElement { ref element, .. } if element == "logger"));

    let xml = format!("{}\n<!-- done -->\n", doc(SchemaVersion::V1_5, ""));
    assert_eq!(decode_str(&xml, &context).unwrap().len(), 1);
}
