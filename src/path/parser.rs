//! Path Parser
//!
//! Recursive descent parser for the location-path subset used to address
//! nodes: absolute and relative paths, `//`, `.`, `..`, `*`, `text()`,
//! `node()`, a final `@name` step and simple predicates.

use super::lexer::{Lexer, Token};

/// Parsed location path
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPath {
    pub absolute: bool,
    pub steps: Vec<Step>,
}

impl LocationPath {
    /// True if the path ends in an attribute step
    pub fn selects_attribute(&self) -> bool {
        self.steps.last().is_some_and(|s| s.axis == Axis::Attribute)
    }
}

/// Location step in a path
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Predicate>,
}

/// Supported axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    DescendantOrSelf,
    SelfNode,
    Parent,
    Attribute,
}

/// Node test in a location step
#[derive(Debug, Clone, PartialEq)]
pub enum NodeTest {
    /// `*`
    Any,
    /// Element or attribute name, with optional prefix
    Name {
        prefix: Option<String>,
        local: String,
    },
    /// `text()`
    Text,
    /// `node()`
    Node,
    /// `comment()`
    Comment,
}

impl NodeTest {
    fn name(qname: &str) -> Self {
        match qname.split_once(':') {
            Some((prefix, local)) => NodeTest::Name {
                prefix: Some(prefix.to_string()),
                local: local.to_string(),
            },
            None => NodeTest::Name {
                prefix: None,
                local: qname.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
}

/// Right-hand side of a comparison predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Number(f64),
}

impl Literal {
    /// Compare a node value against this literal
    pub fn compare(&self, op: CompareOp, value: &str) -> bool {
        let equal = match self {
            Literal::Text(text) => value == text,
            Literal::Number(n) => value.trim().parse::<f64>().is_ok_and(|v| v == *n),
        };
        match op {
            CompareOp::Eq => equal,
            CompareOp::NotEq => !equal,
        }
    }
}

/// Predicate forms understood by the evaluator
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `[n]`, 1-based
    Position(usize),
    /// `[last()]`
    Last,
    /// `[@name]`
    HasAttribute(String),
    /// `[@name='v']`
    Attribute(String, CompareOp, Literal),
    /// `[child]`
    HasChild(String),
    /// `[child='v']`
    Child(String, CompareOp, Literal),
    /// `[text()='v']`
    Text(CompareOp, Literal),
}

/// Path parser over a token list
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Tokenize `input` and prepare to parse it
    pub fn new(input: &str) -> Result<Self, String> {
        let tokens = Lexer::new(input)
            .tokenize()
            .map_err(|(message, offset)| format!("{message} at offset {offset}"))?;
        Ok(Parser { tokens, pos: 0 })
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        let found = self.next();
        if found == expected {
            Ok(())
        } else {
            Err(format!("expected {expected:?}, found {found:?}"))
        }
    }

    /// Parse a complete location path
    pub fn parse(mut self) -> Result<LocationPath, String> {
        let mut path = LocationPath {
            absolute: false,
            steps: Vec::new(),
        };

        match self.peek() {
            Token::Eof => return Err("empty path".to_string()),
            Token::Slash => {
                self.next();
                path.absolute = true;
                if *self.peek() == Token::Eof {
                    return Ok(path);
                }
            }
            Token::DoubleSlash => {
                self.next();
                path.absolute = true;
                path.steps.push(descendant_or_self());
            }
            _ => {}
        }

        loop {
            path.steps.push(self.parse_step()?);

            match self.next() {
                Token::Eof => break,
                Token::Slash => {}
                Token::DoubleSlash => path.steps.push(descendant_or_self()),
                other => return Err(format!("unexpected {other:?} after step")),
            }
        }

        if let Some(i) = path.steps.iter().position(|s| s.axis == Axis::Attribute) {
            if i + 1 != path.steps.len() {
                return Err("attribute step must be the last step".to_string());
            }
        }

        Ok(path)
    }

    fn parse_step(&mut self) -> Result<Step, String> {
        let step = match self.next() {
            Token::Dot => {
                return Ok(Step {
                    axis: Axis::SelfNode,
                    test: NodeTest::Node,
                    predicates: Vec::new(),
                })
            }
            Token::DoubleDot => {
                return Ok(Step {
                    axis: Axis::Parent,
                    test: NodeTest::Node,
                    predicates: Vec::new(),
                })
            }
            Token::At => {
                let test = match self.next() {
                    Token::Name(name) => NodeTest::name(&name),
                    Token::Star => NodeTest::Any,
                    other => return Err(format!("expected attribute name, found {other:?}")),
                };
                Step {
                    axis: Axis::Attribute,
                    test,
                    predicates: Vec::new(),
                }
            }
            Token::Star => Step {
                axis: Axis::Child,
                test: NodeTest::Any,
                predicates: Vec::new(),
            },
            Token::Name(name) if *self.peek() == Token::LeftParen => {
                self.next();
                self.expect(Token::RightParen)?;
                let test = match name.as_str() {
                    "text" => NodeTest::Text,
                    "node" => NodeTest::Node,
                    "comment" => NodeTest::Comment,
                    other => return Err(format!("unsupported node test {other}()")),
                };
                Step {
                    axis: Axis::Child,
                    test,
                    predicates: Vec::new(),
                }
            }
            Token::Name(name) => Step {
                axis: Axis::Child,
                test: NodeTest::name(&name),
                predicates: Vec::new(),
            },
            Token::Eof => return Err("expected a step, found end of path".to_string()),
            other => return Err(format!("expected a step, found {other:?}")),
        };

        let mut step = step;
        while *self.peek() == Token::LeftBracket {
            if step.axis == Axis::Attribute {
                return Err("predicates on attribute steps are not supported".to_string());
            }
            self.next();
            step.predicates.push(self.parse_predicate()?);
            self.expect(Token::RightBracket)?;
        }
        Ok(step)
    }

    fn parse_predicate(&mut self) -> Result<Predicate, String> {
        match self.next() {
            Token::Number(n) => {
                if n >= 1.0 && n.fract() == 0.0 && n <= u32::MAX as f64 {
                    Ok(Predicate::Position(n as usize))
                } else {
                    Err(format!("invalid position {n}"))
                }
            }
            Token::Name(name) if *self.peek() == Token::LeftParen => {
                self.next();
                self.expect(Token::RightParen)?;
                match name.as_str() {
                    "last" => Ok(Predicate::Last),
                    "text" => {
                        let (op, literal) = self.parse_comparison()?;
                        Ok(Predicate::Text(op, literal))
                    }
                    other => Err(format!("unsupported function {other}()")),
                }
            }
            Token::At => {
                let Token::Name(name) = self.next() else {
                    return Err("expected attribute name in predicate".to_string());
                };
                if self.at_comparison() {
                    let (op, literal) = self.parse_comparison()?;
                    Ok(Predicate::Attribute(name, op, literal))
                } else {
                    Ok(Predicate::HasAttribute(name))
                }
            }
            Token::Name(name) => {
                if self.at_comparison() {
                    let (op, literal) = self.parse_comparison()?;
                    Ok(Predicate::Child(name, op, literal))
                } else {
                    Ok(Predicate::HasChild(name))
                }
            }
            other => Err(format!("unsupported predicate starting with {other:?}")),
        }
    }

    fn at_comparison(&self) -> bool {
        matches!(self.peek(), Token::Eq | Token::NotEq)
    }

    fn parse_comparison(&mut self) -> Result<(CompareOp, Literal), String> {
        let op = match self.next() {
            Token::Eq => CompareOp::Eq,
            Token::NotEq => CompareOp::NotEq,
            other => return Err(format!("expected comparison, found {other:?}")),
        };
        let literal = match self.next() {
            Token::Literal(text) => Literal::Text(text),
            Token::Number(n) => Literal::Number(n),
            other => return Err(format!("expected literal, found {other:?}")),
        };
        Ok((op, literal))
    }
}

fn descendant_or_self() -> Step {
    Step {
        axis: Axis::DescendantOrSelf,
        test: NodeTest::Node,
        predicates: Vec::new(),
    }
}

/// Parse a path expression
pub fn parse(input: &str) -> Result<LocationPath, String> {
    Parser::new(input)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(name: &str, predicates: Vec<Predicate>) -> Step {
        Step {
            axis: Axis::Child,
            test: NodeTest::name(name),
            predicates,
        }
    }

    #[test]
    fn test_absolute_with_index() {
        let path = parse("/plane/wings/wing[2]").unwrap();
        assert!(path.absolute);
        assert_eq!(
            path.steps,
            vec![
                child("plane", vec![]),
                child("wings", vec![]),
                child("wing", vec![Predicate::Position(2)]),
            ]
        );
    }

    #[test]
    fn test_descendant_attribute() {
        let path = parse("//@uID").unwrap();
        assert_eq!(path.steps.len(), 2);
        assert_eq!(path.steps[0].axis, Axis::DescendantOrSelf);
        assert!(path.selects_attribute());
    }

    #[test]
    fn test_predicates() {
        let path = parse("/a/b[@uID='w1'][last()]/c[name!=\"x\"][d][@e]").unwrap();
        assert_eq!(
            path.steps[1].predicates,
            vec![
                Predicate::Attribute("uID".into(), CompareOp::Eq, Literal::Text("w1".into())),
                Predicate::Last,
            ]
        );
        assert_eq!(
            path.steps[2].predicates,
            vec![
                Predicate::Child("name".into(), CompareOp::NotEq, Literal::Text("x".into())),
                Predicate::HasChild("d".into()),
                Predicate::HasAttribute("e".into()),
            ]
        );
    }

    #[test]
    fn test_prefixed_step() {
        let path = parse("/c:root").unwrap();
        assert_eq!(
            path.steps[0].test,
            NodeTest::Name {
                prefix: Some("c".into()),
                local: "root".into()
            }
        );
    }

    #[test]
    fn test_malformed_paths() {
        for bad in [
            "", "/a/", "/a//", "/a[0]", "/a[1.5]", "/a[", "/@x/b", "/a/@x[1]", "/a/b()", "/a b",
        ] {
            assert!(parse(bad).is_err(), "`{bad}` should not parse");
        }
    }

    #[test]
    fn test_text_and_parent() {
        let path = parse("a/../b/text()").unwrap();
        assert!(!path.absolute);
        assert_eq!(path.steps[1].axis, Axis::Parent);
        assert_eq!(path.steps[3].test, NodeTest::Text);
    }
}
