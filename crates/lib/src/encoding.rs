//! Percent-encoding rules applied to template fields.
//!
//! Each placeholder kind has exactly one encoding rule:
//!
//! | Rule | Keeps | Used for |
//! |------|-------|----------|
//! | [`component`] | `A-Z a-z 0-9 - _ . ! ~ * ' ( )` | committish inside URL paths |
//! | [`path`] | the component set plus `/` | user, project, file paths |
//! | [`fragment`] | everything but controls, space, double quote, angle brackets, backtick and `%` | committish after `#` |
//!
//! Decoding is strict: a `%` that is not followed by two hex digits, or a
//! decoded byte sequence that is not UTF-8, is rejected instead of being
//! passed through.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Everything but the RFC 3986 unreserved characters and `! * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'-')
  .remove(b'_')
  .remove(b'.')
  .remove(b'!')
  .remove(b'~')
  .remove(b'*')
  .remove(b'\'')
  .remove(b'(')
  .remove(b')');

/// The component set with `/` kept, so each segment is encoded on its own.
const PATH: &AsciiSet = &COMPONENT.remove(b'/');

const FRAGMENT: &AsciiSet = &CONTROLS
  .add(b' ')
  .add(b'"')
  .add(b'<')
  .add(b'>')
  .add(b'`')
  .add(b'%');

/// Encode a value so it can stand alone as one URL path segment.
pub fn component(value: &str) -> Cow<'_, str> {
  utf8_percent_encode(value, COMPONENT).into()
}

/// Encode a value that may span several path segments.
pub fn path(value: &str) -> Cow<'_, str> {
  utf8_percent_encode(value, PATH).into()
}

/// Encode a value placed after a `#`.
pub fn fragment(value: &str) -> Cow<'_, str> {
  utf8_percent_encode(value, FRAGMENT).into()
}

/// Percent-decode `value`, returning `None` on malformed escapes or invalid UTF-8.
pub fn decode(value: &str) -> Option<String> {
  let bytes = value.as_bytes();
  let mut i = 0;
  while i < bytes.len() {
    if bytes[i] == b'%' {
      let valid = bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit) && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
      if !valid {
        return None;
      }
      i += 3;
    } else {
      i += 1;
    }
  }

  percent_decode_str(value).decode_utf8().ok().map(Cow::into_owned)
}
