//! Case transforms applied to the text itself rather than its rendering.

keyword_enum! {
    /// Case rewrite carried by [`AttributeKey::TextTransform`](crate::AttributeKey::TextTransform).
    pub enum TextTransform("text transform") {
        Lowercase => "lowercase",
        Uppercase => "uppercase",
        /// First letter of each word uppercased, the rest lowercased.
        Capitalized => "capitalized",
    }
}

impl TextTransform {
    /// Rewrite `text`. The result may differ in byte length.
    ///
    /// # Example
    ///
    /// ```
    /// use richmark_style::TextTransform;
    ///
    /// assert_eq!(TextTransform::Capitalized.apply("hello wORLD"), "Hello World");
    /// ```
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Lowercase => text.to_lowercase(),
            Self::Uppercase => text.to_uppercase(),
            Self::Capitalized => capitalize(text),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_transforms() {
        assert_eq!(TextTransform::Uppercase.apply("straße"), "STRASSE");
        assert_eq!(TextTransform::Lowercase.apply("ÉCOLE"), "école");
    }

    #[test]
    fn test_capitalized_word_boundaries() {
        assert_eq!(
            TextTransform::Capitalized.apply("the quick-brown fox's 2nd DAY"),
            "The Quick-Brown Fox'S 2nd Day"
        );
        assert_eq!(TextTransform::Capitalized.apply(""), "");
    }

    #[test]
    fn test_parse_keyword() {
        assert_eq!(
            "uppercase".parse::<TextTransform>().unwrap(),
            TextTransform::Uppercase
        );
        assert!("title".parse::<TextTransform>().is_err());
    }
}
