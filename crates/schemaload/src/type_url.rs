// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type URL helpers for envelopes.
//!
//! A type URL is `<prefix>/<fully.qualified.Name>`; only the text after the
//! last `/` identifies the type.

/// Default prefix for packed envelopes.
pub const TYPE_URL_PREFIX: &str = "type.googleapis.com/";

/// Prefix for area-scoped type URLs built by [`generate_type_url`].
pub const AREA_TYPE_URL_PREFIX: &str = "type.intrinsic.ai/";

const SEPARATOR: char = '/';

/// Prepend [`TYPE_URL_PREFIX`] unless it is already there.
pub fn add_type_url_prefix(full_name: &str) -> String {
    if full_name.starts_with(TYPE_URL_PREFIX) {
        return full_name.to_string();
    }
    format!("{}{}", TYPE_URL_PREFIX, full_name)
}

/// Return the fully-qualified type name carried by a type URL.
///
/// A string without any separator is returned unchanged.
pub fn strip_type_url_prefix(type_url: &str) -> &str {
    match type_url.rfind(SEPARATOR) {
        Some(pos) => &type_url[pos + 1..],
        None => type_url,
    }
}

/// Build an area-scoped type URL.
///
/// `generate_type_url("skills", &["ai.my_skill", "1.0.0"], "pkg.Params")`
/// yields `type.intrinsic.ai/skills/ai.my_skill/1.0.0/pkg.Params`.
pub fn generate_type_url(area: &str, path_elements: &[&str], full_name: &str) -> String {
    let mut url = String::with_capacity(
        AREA_TYPE_URL_PREFIX.len()
            + area.len()
            + full_name.len()
            + path_elements.iter().map(|p| p.len() + 1).sum::<usize>()
            + 1,
    );
    url.push_str(AREA_TYPE_URL_PREFIX);
    url.push_str(area);
    for element in path_elements {
        url.push(SEPARATOR);
        url.push_str(element);
    }
    url.push(SEPARATOR);
    url.push_str(full_name);
    url
}
