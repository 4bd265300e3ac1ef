use serde::Serialize;

/// Ordered, de-duplicated ticker symbols as entered by the user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TickerList {
    symbols: Vec<String>,
}

impl TickerList {
    /// Split a comma-separated list, trimming whitespace and dropping empty
    /// and repeated entries.
    pub fn parse(input: &str) -> Self {
        Self::from_iter(input.split(','))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    /// The first `limit` symbols; analyses only ever look at these
    pub fn active(&self, limit: usize) -> &[String] {
        &self.symbols[..self.symbols.len().min(limit)]
    }

    /// Symbols beyond `limit`
    pub fn dropped(&self, limit: usize) -> &[String] {
        &self.symbols[self.symbols.len().min(limit)..]
    }
}

impl<S: AsRef<str>> FromIterator<S> for TickerList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut symbols: Vec<String> = Vec::new();
        for s in iter {
            let s = s.as_ref().trim();
            if !s.is_empty() && !symbols.iter().any(|x| x == s) {
                symbols.push(s.to_string());
            }
        }
        Self { symbols }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_dedups() {
        let list = TickerList::parse(" AAPL, NVDA,,AAPL , msft");
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["AAPL", "NVDA", "msft"]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(TickerList::parse("").is_empty());
        assert!(TickerList::parse(" , ,").is_empty());
    }

    #[test]
    fn test_active_and_dropped() {
        let list = TickerList::parse("A,B,C,D,E,F,G,H");
        assert_eq!(list.active(6).len(), 6);
        assert_eq!(list.dropped(6), &["G".to_string(), "H".to_string()]);
        assert!(TickerList::parse("A").dropped(6).is_empty());
    }
}
