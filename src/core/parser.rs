//! Mask parser
//!
//! Expects something in the form:
//!
//! ```text
//! {field,nested{nested_field,another},last}
//! ```
//!
//! External brackets are optional, so this is equivalent:
//!
//! ```text
//! field,nested{nested_field,another},last
//! ```
//!
//! The parser is a single forward pass over the token stream driven by an
//! explicit [`ParserState`], with a stack holding the groups still open.

use super::error::ParseError;
use super::lexer::{self, Token};
use super::mask::{MaskEntry, MaskNode};

/// Where the parser stands relative to the last token it consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState<'a> {
    /// Start of input, or right after a `{`
    AwaitingItem,
    /// Right after a field name, which may still open a group
    AfterField(&'a str),
    /// Right after a `}`
    AfterGroup,
    /// Right after a `,`
    AfterComma,
}

/// What to do with the current token, as decided by [`transition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    /// Mark the field as selected in the current group
    Select(&'a str),
    /// Turn the field into a nested group and descend into it
    Open(&'a str),
    /// Close the current group
    Close,
    /// Nothing to record
    Separate,
}

/// The transition table of the mask grammar
///
/// Returns the action for `token` in `state` and the state that follows, or
/// the syntax error the token triggers. Closing a group when none is open is
/// checked by the caller, which owns the stack.
pub fn transition<'a>(
    state: ParserState<'a>,
    token: Token<'a>,
) -> Result<(Action<'a>, ParserState<'a>), ParseError> {
    match (state, token) {
        (_, Token::Field(name)) => Ok((Action::Select(name), ParserState::AfterField(name))),
        (ParserState::AfterField(name), Token::Open) => {
            Ok((Action::Open(name), ParserState::AwaitingItem))
        }
        (_, Token::Open) => Err(ParseError::UnexpectedOpeningBracket),
        (_, Token::Close) => Ok((Action::Close, ParserState::AfterGroup)),
        (ParserState::AwaitingItem | ParserState::AfterComma, Token::Comma) => {
            Err(ParseError::UnexpectedComma)
        }
        (ParserState::AfterField(_) | ParserState::AfterGroup, Token::Comma) => {
            Ok((Action::Separate, ParserState::AfterComma))
        }
    }
}

/// A group still being filled, waiting for its `}`
struct Frame {
    /// The enclosing group
    parent: MaskNode,
    /// The field of `parent` this group belongs to
    field: String,
}

/// Parse a mask string into a tree
///
/// Empty input (or input that is empty once cleaned) yields an empty mask.
pub fn parse(text: &str, skip: bool) -> Result<MaskNode, ParseError> {
    let mut current = MaskNode::new(skip);
    if text.is_empty() {
        return Ok(current);
    }

    let cleaned = lexer::clean(text)?;
    let mut stack: Vec<Frame> = Vec::new();
    let mut state = ParserState::AwaitingItem;

    for token in lexer::tokenize(&cleaned) {
        let (action, next) = transition(state, token)?;
        match action {
            Action::Select(name) => current.insert(name, MaskEntry::Selected),
            Action::Open(name) => {
                let parent = std::mem::replace(&mut current, MaskNode::new(skip));
                stack.push(Frame {
                    parent,
                    field: name.to_string(),
                });
            }
            Action::Close => {
                let Some(frame) = stack.pop() else {
                    return Err(ParseError::UnexpectedClosingBracket);
                };
                let child = std::mem::replace(&mut current, frame.parent);
                current.insert(&frame.field, MaskEntry::Nested(child));
            }
            Action::Separate => {}
        }
        state = next;
    }

    if !stack.is_empty() {
        return Err(ParseError::MissingClosingBracket);
    }

    Ok(current)
}
