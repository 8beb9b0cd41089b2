//! Newick tokenizer and recursive-descent parser.
//!
//! Accepts the usual dialect found in species-tree and gene-tree files:
//! unquoted labels, single-quoted labels with `''` as an escaped quote,
//! optional `:length` suffixes (including exponents), labels on internal
//! nodes, `[...]` comments (skipped), and arbitrary whitespace. Polytomies
//! are allowed here; callers that need binary trees check arity themselves.
use crate::phylo::{
    errors::{TreeError, TreeResult},
    tree::{RootedTree, TreeNode},
};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LParen,
    RParen,
    Comma,
    Colon,
    Semi,
    Label(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Comma => ",".to_string(),
            Token::Colon => ":".to_string(),
            Token::Semi => ";".to_string(),
            Token::Label(s) => s.clone(),
        }
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '(' | ')' | ',' | ':' | ';' | '[' | '\'') || c.is_whitespace()
}

fn tokenise(s: &str) -> TreeResult<Vec<(Token, usize)>> {
    let chars: Vec<char> = s.chars().collect();
    let mut toks = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '(' => toks.push((Token::LParen, i)),
            ')' => toks.push((Token::RParen, i)),
            ',' => toks.push((Token::Comma, i)),
            ':' => toks.push((Token::Colon, i)),
            ';' => toks.push((Token::Semi, i)),
            '[' => {
                let start = i;
                while i < chars.len() && chars[i] != ']' {
                    i += 1;
                }
                if i == chars.len() {
                    return Err(TreeError::Unterminated { what: "comment", position: start });
                }
            }
            '\'' => {
                let start = i;
                let mut buf = String::new();
                i += 1;
                loop {
                    if i >= chars.len() {
                        return Err(TreeError::Unterminated { what: "quoted label", position: start });
                    }
                    if chars[i] == '\'' {
                        if i + 1 < chars.len() && chars[i + 1] == '\'' {
                            buf.push('\'');
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    buf.push(chars[i]);
                    i += 1;
                }
                toks.push((Token::Label(buf), start));
            }
            c if c.is_whitespace() => {}
            _ => {
                let start = i;
                let mut buf = String::new();
                while i < chars.len() && !is_delimiter(chars[i]) {
                    buf.push(chars[i]);
                    i += 1;
                }
                toks.push((Token::Label(buf), start));
                continue;
            }
        }
        i += 1;
    }
    Ok(toks)
}

struct Parser {
    toks: Vec<(Token, usize)>,
    pos: usize,
    nodes: Vec<TreeNode>,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.toks.get(self.pos).map(|(t, _)| t)
    }

    fn position(&self) -> usize {
        self.toks.get(self.pos).map(|(_, p)| *p).unwrap_or(0)
    }

    fn unexpected(&self, expected: &'static str) -> TreeError {
        match self.toks.get(self.pos) {
            Some((tok, position)) => {
                TreeError::UnexpectedToken { expected, found: tok.describe(), position: *position }
            }
            None => TreeError::UnexpectedEnd { expected },
        }
    }

    fn add(&mut self, node: TreeNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// subtree := ( '(' subtree (',' subtree)* ')' )? label? (':' length)?
    fn parse_subtree(&mut self) -> TreeResult<usize> {
        let id = self.add(TreeNode::blank());
        if let Some(Token::LParen) = self.peek() {
            self.pos += 1;
            loop {
                let child = self.parse_subtree()?;
                self.nodes[child].parent = Some(id);
                self.nodes[id].children.push(child);
                match self.peek() {
                    Some(Token::Comma) => self.pos += 1,
                    Some(Token::RParen) => {
                        self.pos += 1;
                        break;
                    }
                    _ => return Err(self.unexpected("',' or ')'")),
                }
            }
        }

        if let Some(Token::Label(name)) = self.peek() {
            let name = name.clone();
            self.pos += 1;
            if !name.is_empty() {
                self.nodes[id].label = Some(name);
            }
        } else if self.nodes[id].children.is_empty() {
            // A leaf with no label (e.g. "(,);") is legal newick.
            if !matches!(self.peek(), Some(Token::Colon | Token::Comma | Token::RParen)) {
                return Err(self.unexpected("label"));
            }
        }

        if let Some(Token::Colon) = self.peek() {
            self.pos += 1;
            let position = self.position();
            match self.peek() {
                Some(Token::Label(text)) => {
                    let value = text.parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(
                        || TreeError::InvalidLength { text: text.clone(), position },
                    )?;
                    self.nodes[id].length = Some(value);
                    self.pos += 1;
                }
                _ => return Err(self.unexpected("branch length")),
            }
        }
        Ok(id)
    }
}

/// Parse a single newick string into a [`RootedTree`].
///
/// The terminating `;` is optional; anything after it is an error.
pub fn parse(s: &str) -> TreeResult<RootedTree> {
    let toks = tokenise(s)?;
    if toks.is_empty() {
        return Err(TreeError::EmptyInput);
    }
    let mut parser = Parser { toks, pos: 0, nodes: Vec::new() };
    let root = parser.parse_subtree()?;
    if let Some(Token::Semi) = parser.peek() {
        parser.pos += 1;
    }
    if parser.pos < parser.toks.len() {
        return Err(TreeError::TrailingInput { position: parser.position() });
    }
    Ok(RootedTree::from_nodes(parser.nodes, root))
}
