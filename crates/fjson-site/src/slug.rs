//! Heading anchor generation.

/// Convert heading text to a URL fragment.
///
/// Lower-cases letters, collapses every run of characters that are neither
/// letters nor digits into a single dash, and trims dashes from both ends.
/// The output only contains lower-case alphanumerics and single inner
/// dashes, so slugifying a slug returns it unchanged.
///
/// # Examples
///
/// ```
/// use fjson_site::slugify;
///
/// assert_eq!(slugify("Creating a Page"), "creating-a-page");
/// assert_eq!(slugify("What's New?"), "what-s-new");
/// assert_eq!(slugify("creating-a-page"), "creating-a-page");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if !c.is_alphanumeric() {
            pending_dash = true;
            continue;
        }
        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        slug.extend(c.to_lowercase().filter(|lc| lc.is_alphanumeric()));
    }

    slug
}
