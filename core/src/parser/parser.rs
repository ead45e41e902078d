//! Recursive-descent parser with precedence climbing for binary operators.

use super::{Node, ParseError};
use crate::lexer::{Position, Token, TokenKind};
use crate::registry::Registry;
use std::sync::Arc;

/// Parse a token stream into an expression tree.
///
/// Operator precedences come from `registry`. Nesting (parenthesized groups,
/// call arguments and prefix operators) deeper than `max_depth` levels below
/// the top-level expression fails with [`ParseError::MaxDepthExceeded`].
pub fn parse(tokens: &[Token], registry: &Registry, max_depth: usize) -> Result<Node, ParseError> {
    let mut parser = Parser {
        tokens,
        cursor: 0,
        depth: 0,
        max_depth,
        registry,
    };
    let node = parser.parse_expression()?;

    let trailing = parser.peek();
    if trailing.kind != TokenKind::Eof {
        return Err(ParseError::UnexpectedToken {
            expected: "end of input".to_string(),
            found: trailing.to_string(),
            pos: trailing.pos,
        });
    }
    Ok(node)
}

struct Parser<'a> {
    tokens: &'a [Token],
    cursor: usize,
    depth: usize,
    max_depth: usize,
    registry: &'a Registry,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &'a Token {
        // The lexer always terminates the stream with EOF; clamp to it.
        let tokens = self.tokens;
        &tokens[self.cursor.min(tokens.len().saturating_sub(1))]
    }

    fn advance(&mut self) -> &'a Token {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.cursor += 1;
        }
        token
    }

    fn enter(&mut self, pos: Position) -> Result<(), ParseError> {
        if self.depth > self.max_depth {
            return Err(ParseError::MaxDepthExceeded {
                max_depth: self.max_depth,
                pos,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_expression(&mut self) -> Result<Node, ParseError> {
        self.enter(self.peek().pos)?;
        let result = self.parse_binary(0);
        self.leave();
        result
    }

    fn parse_binary(&mut self, min_precedence: u32) -> Result<Node, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let token = self.peek();
            if token.kind != TokenKind::Operator {
                break;
            }
            let Some(operator) = self.registry.operator(&token.text) else {
                return Err(ParseError::UnknownOperator {
                    name: token.text.clone(),
                    pos: token.pos,
                });
            };
            if operator.precedence() < min_precedence {
                break;
            }
            self.advance();

            let right = self.parse_binary(operator.precedence() + 1)?;
            left = Node::binary(token.text.clone(), left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        let token = self.peek();
        if token.kind == TokenKind::Operator && self.registry.prefix_operator(&token.text).is_some()
        {
            self.advance();
            self.enter(token.pos)?;
            let operand = self.parse_unary();
            self.leave();
            return Ok(Node::prefix(token.text.clone(), operand?));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number => token
                .text
                .parse::<f64>()
                .map(Node::Number)
                .map_err(|_| ParseError::InvalidNumber {
                    text: token.text.clone(),
                    pos: token.pos,
                }),
            TokenKind::String => Ok(Node::Str(Arc::from(token.text.as_str()))),
            TokenKind::Identifier if self.peek().kind == TokenKind::LParen => {
                let open = self.advance();
                let args = self.parse_arguments(&token.text, open.pos)?;
                Ok(Node::call(token.text.clone(), args))
            }
            TokenKind::Identifier => Ok(Node::Ident(token.text.clone())),
            TokenKind::LParen => {
                let inner = self.parse_expression()?;
                self.expect_closing(token.pos)?;
                Ok(inner)
            }
            _ => Err(ParseError::UnexpectedToken {
                expected: "expression".to_string(),
                found: token.to_string(),
                pos: token.pos,
            }),
        }
    }

    /// Parse `arg, arg, ...)` after the opening parenthesis of a call.
    fn parse_arguments(&mut self, function: &str, open: Position) -> Result<Vec<Node>, ParseError> {
        let mut args = Vec::new();
        if self.peek().kind == TokenKind::RParen {
            self.advance();
            return Ok(args);
        }

        loop {
            let token = self.peek();
            if token.kind == TokenKind::Comma {
                return Err(ParseError::EmptyArgument {
                    function: function.to_string(),
                    pos: token.pos,
                });
            }
            args.push(self.parse_expression()?);

            match self.peek().kind {
                TokenKind::Comma => {
                    self.advance();
                }
                _ => {
                    self.expect_closing(open)?;
                    return Ok(args);
                }
            }
        }
    }

    fn expect_closing(&mut self, open: Position) -> Result<(), ParseError> {
        let token = self.peek();
        if token.kind == TokenKind::RParen {
            self.advance();
            return Ok(());
        }
        Err(ParseError::MissingClosingParen {
            open,
            found: token.to_string(),
            pos: token.pos,
        })
    }
}
