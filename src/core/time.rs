use time::{format_description::well_known::Rfc3339, OffsetDateTime, PrimitiveDateTime};

/// Wall clock reading stored in TIMESTAMP columns; always UTC.
pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

/// RFC 3339 rendering for API payloads.
pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    let utc = value.assume_utc();
    utc.format(&Rfc3339).unwrap_or_else(|_| utc.to_string())
}
