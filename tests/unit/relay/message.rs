use super::*;

fn form(name: &str, email: &str, subject: &str, message: &str) -> ContactForm {
    ContactForm {
        name: Some(name.into()),
        email: Some(email.into()),
        subject: Some(subject.into()),
        message: Some(message.into()),
    }
}

#[test]
fn email_shape_check() {
    for ok in ["a@b.co", "first.last@mail.example.org", "x@y.z"] {
        assert!(is_valid_email(ok), "{ok}");
    }
    for bad in [
        "bad-email",
        "@b.co",
        "a@.co",
        "a@b.",
        "a@bco",
        "a b@c.d",
        "a@b@c.d",
        "",
    ] {
        assert!(!is_valid_email(bad), "{bad}");
    }
}

#[test]
fn missing_or_empty_fields_are_rejected_before_the_address() {
    assert_eq!(
        ContactForm::default().validate(),
        Err(ValidationError::MissingFields)
    );
    assert_eq!(
        form("A", "bad-email", "", "M").validate(),
        Err(ValidationError::MissingFields)
    );
    assert_eq!(
        form("A", "bad-email", "S", "M").validate(),
        Err(ValidationError::InvalidEmail)
    );
}

#[test]
fn form_deserializes_with_missing_keys() {
    let parsed: ContactForm = serde_json::from_str(r#"{"name":"A","email":"a@b.co"}"#).unwrap();
    assert_eq!(parsed.subject, None);
    assert_eq!(parsed.validate(), Err(ValidationError::MissingFields));
}

#[test]
fn notification_is_addressed_to_the_owner_and_escaped() {
    let msg = form("<b>Eve</b>", "eve@example.com", "Hi & bye", "line1\nline2")
        .validate()
        .unwrap();
    let mail = msg.notification("me@163.com", "inbox@example.com");
    assert_eq!(mail.from_name, "我的小天地");
    assert_eq!(mail.from_address, "me@163.com");
    assert_eq!(mail.to, "inbox@example.com");
    assert_eq!(mail.reply_to.as_deref(), Some("eve@example.com"));
    assert_eq!(mail.subject, "[网站留言] Hi & bye");
    assert!(mail.html.contains("&lt;b&gt;Eve&lt;/b&gt;"));
    assert!(mail.html.contains("Hi &amp; bye"));
    assert!(mail.html.contains("mailto:eve@example.com"));
    assert!(mail.html.contains("line1\nline2"));
    assert!(!mail.html.contains("<b>Eve"));
}

#[test]
fn auto_reply_goes_back_to_the_visitor() {
    let msg = form("Ann", "ann@example.com", "S", "M").validate().unwrap();
    let reply = msg.auto_reply("me@163.com", None);
    assert_eq!(reply.to, "ann@example.com");
    assert_eq!(reply.reply_to, None);
    assert_eq!(reply.subject, "感谢你的留言！");
    assert!(reply.html.contains("嗨 Ann"));
    assert!(!reply.html.contains("微信"));

    let reply = msg.auto_reply("me@163.com", Some("ann_wx"));
    assert!(reply.html.contains("<strong>ann_wx</strong>"));
}

#[test]
fn escape_covers_quotes() {
    assert_eq!(escape_html(r#"a"b'c"#), "a&quot;b&#39;c");
}

#[test]
fn email_pattern_compiles_and_allows_nested_domains() {
    assert!(EMAIL_PATTERN.is_some());
    assert!(is_valid_email("a@mail.b.c"));
    assert!(!is_valid_email("a@b.c\n"));
    assert!(!is_valid_email("a\t@b.c"));
}
