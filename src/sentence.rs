//! Host-supplied sentence and token annotations.
//!
//! Sentence segmentation, tokenization and POS tagging happen upstream; this
//! module only carries their results. All offsets are byte offsets into the
//! document the sentence was cut from.

/// A token span with an optional part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Start byte offset in the document (inclusive).
    pub begin: usize,
    /// End byte offset in the document (exclusive).
    pub end: usize,
    pub pos: Option<String>,
}

impl Token {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end, pos: None }
    }

    pub fn with_pos(begin: usize, end: usize, pos: impl Into<String>) -> Self {
        Self { begin, end, pos: Some(pos.into()) }
    }
}

/// One sentence of a document: its text, its absolute span and its tokens.
#[derive(Debug, Clone)]
pub struct SentenceContainer {
    text: String,
    begin: usize,
    end: usize,
    tokens: Vec<Token>,
}

impl SentenceContainer {
    /// Build a sentence whose first byte sits at document offset `begin`.
    ///
    /// Tokens are kept sorted by position regardless of the order they are
    /// supplied in.
    pub fn new(text: impl Into<String>, begin: usize, mut tokens: Vec<Token>) -> Self {
        let text = text.into();
        let end = begin + text.len();
        tokens.sort_by_key(|t| (t.begin, t.end));
        Self { text, begin, end, tokens }
    }

    /// Build a sentence with a simple word/punctuation split and no POS tags.
    ///
    /// Meant for callers without an upstream tokenizer. Rules carrying POS
    /// constraints never fire on such sentences.
    pub fn tokenize_simple(text: impl Into<String>, begin: usize) -> Self {
        let text = text.into();
        let tokens = regex!(r"\w+(?:['’]\w+)*|[^\w\s]")
            .find_iter(&text)
            .map(|m| Token::new(begin + m.start(), begin + m.end()))
            .collect();
        Self::new(text, begin, tokens)
    }

    /// Split `document` into sentences on terminal punctuation and tokenize
    /// each with [`SentenceContainer::tokenize_simple`].
    pub fn split_document(document: &str) -> Vec<SentenceContainer> {
        regex!(r"[^.!?\s][^.!?]*(?:[.!?]+|$)")
            .find_iter(document)
            .map(|m| Self::tokenize_simple(m.as_str().trim_end(), m.start()))
            .collect()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Surface text of `token`, or `""` if it lies outside this sentence.
    pub fn token_text(&self, token: &Token) -> &str {
        let (Some(start), Some(end)) = (token.begin.checked_sub(self.begin), token.end.checked_sub(self.begin))
        else {
            return "";
        };
        self.text.get(start..end).unwrap_or("")
    }

    /// The token starting exactly at document offset `begin`.
    pub fn token_starting_at(&self, begin: usize) -> Option<&Token> {
        self.tokens.iter().find(|t| t.begin == begin)
    }

    pub fn contains_span(&self, begin: usize, end: usize) -> bool {
        self.begin <= begin && end <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_sorted_and_texts_resolve() {
        let sentence = SentenceContainer::new(
            "In 1999 he left",
            10,
            vec![Token::new(18, 20), Token::new(10, 12), Token::with_pos(13, 17, "CD")],
        );
        assert_eq!(sentence.end(), 25);
        let texts: Vec<&str> = sentence.tokens().iter().map(|t| sentence.token_text(t)).collect();
        assert_eq!(texts, ["In", "1999", "he"]);
        assert_eq!(sentence.token_starting_at(13).and_then(|t| t.pos.as_deref()), Some("CD"));
        assert!(sentence.token_starting_at(14).is_none());
    }

    #[test]
    fn simple_tokenizer_splits_punctuation() {
        let sentence = SentenceContainer::tokenize_simple("1990. New Sentence", 0);
        let spans: Vec<(usize, usize)> = sentence.tokens().iter().map(|t| (t.begin, t.end)).collect();
        assert_eq!(spans, [(0, 4), (4, 5), (6, 9), (10, 18)]);
    }

    #[test]
    fn document_split_keeps_absolute_offsets() {
        let doc = "It rained in 2010. Then it stopped!  Fine";
        let sentences = SentenceContainer::split_document(doc);
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[1].text(), "Then it stopped!");
        assert_eq!(&doc[sentences[1].begin()..sentences[1].end()], "Then it stopped!");
        assert_eq!(sentences[2].text(), "Fine");
    }
}
