/// Turn a title into a URL slug: lowercase ASCII words joined by dashes.
///
/// Returns `"tutorial"` when nothing usable is left.
pub fn slugify(title: &str) -> String {
  let mut slug = String::with_capacity(title.len());
  for c in title.chars() {
    if c.is_ascii_alphanumeric() {
      slug.push(c.to_ascii_lowercase());
    } else if !slug.is_empty() && !slug.ends_with('-') {
      slug.push('-');
    }
  }

  let slug = slug.trim_end_matches('-');
  if slug.is_empty() {
    "tutorial".to_string()
  } else {
    slug.to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_slugify() {
    assert_eq!(
      slugify("Internet Connection Troubleshooting"),
      "internet-connection-troubleshooting"
    );
    assert_eq!(slugify("  Wi-Fi: reset!  "), "wi-fi-reset");
    assert_eq!(slugify("???"), "tutorial");
  }
}
