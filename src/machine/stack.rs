//! Active-state stack.
//!
//! Frames are ordered root first. Every frame gets a token that is never
//! reused, so code running after a callback can find "the frame it saw"
//! even when the callback reshaped the stack in between.

use crate::core::{wrap_index, State, StateId};

/// Unique identity of one stack entry.
pub(crate) type Token = u64;

#[derive(Clone, Debug)]
pub(crate) struct Frame {
    pub(crate) token: Token,
    pub(crate) state: State,
}

/// Root-to-innermost sequence of active states.
#[derive(Clone, Debug, Default)]
pub struct ActiveStack {
    frames: Vec<Frame>,
    next_token: Token,
}

impl ActiveStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn mint(&mut self) -> Token {
        let token = self.next_token;
        self.next_token += 1;
        token
    }

    pub(crate) fn push(&mut self, state: State) -> Token {
        let token = self.mint();
        self.frames.push(Frame { token, state });
        token
    }

    /// Overwrite the frame holding `token`, giving it a fresh token.
    /// Returns `None` if that frame is no longer on the stack.
    pub(crate) fn replace(&mut self, token: Token, state: State) -> Option<Token> {
        let index = self.position(token)?;
        let fresh = self.mint();
        self.frames[index] = Frame {
            token: fresh,
            state,
        };
        Some(fresh)
    }

    pub(crate) fn remove(&mut self, token: Token) -> Option<State> {
        let index = self.position(token)?;
        Some(self.frames.remove(index).state)
    }

    pub(crate) fn position(&self, token: Token) -> Option<usize> {
        self.frames.iter().rposition(|f| f.token == token)
    }

    pub(crate) fn lookup(&self, token: Token) -> Option<&State> {
        self.position(token).map(|i| &self.frames[i].state)
    }

    pub(crate) fn top_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub(crate) fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Innermost active state.
    pub fn top(&self) -> Option<&State> {
        self.frames.last().map(|f| &f.state)
    }

    /// Outermost active state.
    pub fn root(&self) -> Option<&State> {
        self.frames.first().map(|f| &f.state)
    }

    /// Wraparound accessor; `0` and `-1` are the innermost state, `-len` the root.
    pub fn get(&self, pos: isize) -> Option<&State> {
        wrap_index(pos, self.frames.len()).map(|i| &self.frames[i].state)
    }

    /// States from root to innermost.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &State> + '_ {
        self.frames.iter().map(|f| &f.state)
    }

    pub fn contains(&self, id: &StateId) -> bool {
        self.frames.iter().any(|f| f.state.id() == id)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(names: &[&str]) -> ActiveStack {
        let mut stack = ActiveStack::new();
        for name in names {
            stack.push(State::named(*name));
        }
        stack
    }

    fn ids(stack: &ActiveStack) -> Vec<String> {
        stack.iter().map(|s| s.id().to_string()).collect()
    }

    #[test]
    fn tokens_are_never_reused() {
        let mut stack = ActiveStack::new();
        let a = stack.push(State::named("a"));
        stack.remove(a);
        let b = stack.push(State::named("a"));
        assert_ne!(a, b);
    }

    #[test]
    fn replace_keeps_depth_and_refreshes_token() {
        let mut stack = stack_of(&["root", "child"]);
        let old = stack.top_frame().unwrap().token;

        let fresh = stack.replace(old, State::named("other")).unwrap();

        assert_ne!(old, fresh);
        assert_eq!(ids(&stack), ["root", "other"]);
        assert!(stack.lookup(old).is_none());
        assert!(stack.replace(old, State::named("again")).is_none());
    }

    #[test]
    fn remove_by_token_finds_inner_frames() {
        let mut stack = stack_of(&["a", "b", "c"]);
        let b = stack.frames()[1].token;

        assert_eq!(stack.remove(b), Some(State::named("b")));
        assert_eq!(ids(&stack), ["a", "c"]);
        assert_eq!(stack.remove(b), None);
    }

    #[test]
    fn get_wraps_like_python() {
        let stack = stack_of(&["s0", "s1", "s2", "s3"]);

        assert_eq!(stack.get(-1), Some(&State::named("s3")));
        assert_eq!(stack.get(-4), Some(&State::named("s0")));
        assert_eq!(stack.get(0), stack.get(-1));
        assert_eq!(stack.get(1), Some(&State::named("s2")));
        assert_eq!(stack.get(4), Some(&State::named("s3")));
        assert_eq!(stack.get(-5), Some(&State::named("s3")));
    }

    #[test]
    fn empty_stack_yields_none() {
        let stack = ActiveStack::new();
        assert!(stack.top().is_none());
        assert!(stack.root().is_none());
        assert!(stack.get(0).is_none());
        assert!(stack.get(-1).is_none());
    }

    #[test]
    fn contains_checks_every_depth() {
        let stack = stack_of(&["a", "b"]);
        assert!(stack.contains(&StateId::name("a")));
        assert!(stack.contains(&StateId::name("b")));
        assert!(!stack.contains(&StateId::name("c")));
    }
}
