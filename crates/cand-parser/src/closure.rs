//! The shift-reduce scratchpad: a token stream and its closures.
//!
//! Two arena-backed doubly linked lists. The *stream* holds tokens; the
//! *closures* are spans `[front, back]` into the stream, each standing
//! for one not-yet-descended operand or operator unit. Both lists start
//! with a sentinel that is never removed.
//!
//! Everything is addressed by arena index, so inserting a token next to
//! one closure never invalidates another closure's span, which is the
//! property the whole rewriting phase depends on. Unlinked entries stay
//! in the arena; the buffer is short-lived scratch space.

use cand_common::grammar::{Arity, Assoc, Priority};
use cand_common::token::{Token, TokenKind};

/// Index of a token in the stream arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamId(usize);

/// Index of a closure in the closure arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosureId(usize);

#[derive(Debug)]
struct StreamNode {
    token: Token,
    prev: Option<StreamId>,
    next: Option<StreamId>,
}

#[derive(Debug)]
struct ClosureNode {
    front: StreamId,
    back: StreamId,
    prev: Option<ClosureId>,
    next: Option<ClosureId>,
}

#[derive(Debug)]
pub struct ClosureBuffer {
    stream: Vec<StreamNode>,
    stream_tail: StreamId,
    closures: Vec<ClosureNode>,
    closure_tail: ClosureId,
    live_closures: usize,
}

impl ClosureBuffer {
    pub fn new() -> Self {
        // Sentinel token and sentinel closure referencing it. Without
        // them the first insert-before would have no anchor.
        let stream = vec![StreamNode {
            token: Token::new(TokenKind::Eof),
            prev: None,
            next: None,
        }];
        let closures = vec![ClosureNode {
            front: StreamId(0),
            back: StreamId(0),
            prev: None,
            next: None,
        }];
        Self {
            stream,
            stream_tail: StreamId(0),
            closures,
            closure_tail: ClosureId(0),
            live_closures: 0,
        }
    }

    fn sentinel(&self) -> ClosureId {
        ClosureId(0)
    }

    // ── Stream operations ──────────────────────────────────────────────

    /// Append a token to the end of the stream.
    pub fn stream_push_back(&mut self, token: Token) -> StreamId {
        let id = StreamId(self.stream.len());
        self.stream.push(StreamNode {
            token,
            prev: Some(self.stream_tail),
            next: None,
        });
        self.stream[self.stream_tail.0].next = Some(id);
        self.stream_tail = id;
        id
    }

    /// The most recently appended stream position.
    pub fn last_streamed(&self) -> StreamId {
        self.stream_tail
    }

    fn stream_insert_after(&mut self, anchor: StreamId, token: Token) -> StreamId {
        let id = StreamId(self.stream.len());
        let next = self.stream[anchor.0].next;
        self.stream.push(StreamNode {
            token,
            prev: Some(anchor),
            next,
        });
        self.stream[anchor.0].next = Some(id);
        match next {
            Some(n) => self.stream[n.0].prev = Some(id),
            None => self.stream_tail = id,
        }
        id
    }

    /// Insert a token directly before the given closure's front token.
    pub fn stream_insert_before_closure(&mut self, closure: ClosureId, token: Token) {
        let front = self.closures[closure.0].front;
        let anchor = self.stream[front.0]
            .prev
            .expect("only the sentinel token has no predecessor");
        self.stream_insert_after(anchor, token);
    }

    /// Insert a token directly after the given closure's back token.
    pub fn stream_insert_after_closure(&mut self, closure: ClosureId, token: Token) {
        let back = self.closures[closure.0].back;
        self.stream_insert_after(back, token);
    }

    /// The non-sentinel stream contents, in order.
    pub fn stream_to_vec(&self) -> Vec<Token> {
        let mut out = Vec::new();
        let mut at = self.stream[0].next;
        while let Some(id) = at {
            out.push(self.stream[id.0].token.clone());
            at = self.stream[id.0].next;
        }
        out
    }

    // ── Closure operations ─────────────────────────────────────────────

    /// Append a single-token closure.
    pub fn push_back_closure(&mut self, front: StreamId) -> ClosureId {
        self.push_back_closure_span(front, front)
    }

    /// Append a closure spanning `[front, back]`.
    pub fn push_back_closure_span(&mut self, front: StreamId, back: StreamId) -> ClosureId {
        let id = ClosureId(self.closures.len());
        self.closures.push(ClosureNode {
            front,
            back,
            prev: Some(self.closure_tail),
            next: None,
        });
        self.closures[self.closure_tail.0].next = Some(id);
        self.closure_tail = id;
        self.live_closures += 1;
        id
    }

    /// Remove the newest closure. The sentinel is never popped.
    pub fn pop_closure(&mut self) {
        let tail = self.closure_tail;
        assert!(tail != self.sentinel(), "attempted to pop the sentinel closure");
        self.pop_closure_at(tail);
    }

    /// Remove a specific closure; the stream is untouched.
    pub fn pop_closure_at(&mut self, id: ClosureId) {
        assert!(id != self.sentinel(), "attempted to pop the sentinel closure");
        let prev = self.closures[id.0].prev;
        let next = self.closures[id.0].next;
        if let Some(p) = prev {
            self.closures[p.0].next = next;
        }
        match next {
            Some(n) => self.closures[n.0].prev = prev,
            None => {
                self.closure_tail = prev.expect("unlinked closure had no predecessor");
            }
        }
        self.closures[id.0].prev = None;
        self.closures[id.0].next = None;
        self.live_closures -= 1;
    }

    /// Number of closures, excluding the sentinel.
    pub fn closure_count(&self) -> usize {
        self.live_closures
    }

    /// The newest closure (the sentinel when none are live).
    pub fn last_closure(&self) -> ClosureId {
        self.closure_tail
    }

    /// The closure before `id`, or `None` at the sentinel.
    pub fn prev_closure(&self, id: ClosureId) -> Option<ClosureId> {
        self.closures[id.0].prev
    }

    /// The closure `n` steps before `id`. Walking past the sentinel is
    /// a logic error.
    pub fn nth_prev_closure(&self, id: ClosureId, n: usize) -> ClosureId {
        let mut at = id;
        for _ in 0..n {
            at = self.closures[at.0]
                .prev
                .expect("walked past the sentinel closure");
        }
        at
    }

    /// The token at a closure's front.
    pub fn front_token(&self, id: ClosureId) -> &Token {
        &self.stream[self.closures[id.0].front.0].token
    }

    // ── Closure traits ─────────────────────────────────────────────────
    //
    // A closure behaves as its front token, except that the three
    // openers act as postfix operators (call, index and list trailers).

    pub fn priority(&self, id: ClosureId) -> Priority {
        let token = self.front_token(id);
        if token.is_opener() {
            Priority::Postfix
        } else {
            token.priority()
        }
    }

    pub fn arity(&self, id: ClosureId) -> Arity {
        let token = self.front_token(id);
        if token.is_opener() {
            Arity::Postfix
        } else {
            token.arity()
        }
    }

    pub fn assoc(&self, id: ClosureId) -> Assoc {
        self.front_token(id).assoc()
    }

    // ── Searching ──────────────────────────────────────────────────────

    /// From the newest closure backward, collect the run of closures
    /// where `pred(newer, older)` holds between neighbours. The first
    /// closure whose pairing fails is still collected (it breaks the
    /// run); the sentinel never is.
    pub fn find_closure_reverse_consecutive(
        &self,
        pred: impl Fn(&Self, ClosureId, ClosureId) -> bool,
    ) -> Vec<ClosureId> {
        let mut out = Vec::new();
        let mut at = self.closure_tail;
        while at != self.sentinel() {
            let older = self.closures[at.0]
                .prev
                .expect("live closure had no predecessor");
            out.push(at);
            if !pred(self, at, older) {
                break;
            }
            at = older;
        }
        out
    }

    /// Like [`Self::find_closure_reverse_consecutive`], but closures
    /// satisfying `skip` are passed over without joining or breaking
    /// the run.
    pub fn find_closure_reverse_consecutive_and_ignore(
        &self,
        pred: impl Fn(&Self, ClosureId, ClosureId) -> bool,
        skip: impl Fn(&Self, ClosureId) -> bool,
    ) -> Vec<ClosureId> {
        let mut out = Vec::new();
        let mut at = self.closure_tail;
        while at != self.sentinel() {
            if skip(self, at) {
                at = self.closures[at.0]
                    .prev
                    .expect("live closure had no predecessor");
                continue;
            }
            let mut older = self.closures[at.0]
                .prev
                .expect("live closure had no predecessor");
            while older != self.sentinel() && skip(self, older) {
                older = self.closures[older.0]
                    .prev
                    .expect("live closure had no predecessor");
            }
            out.push(at);
            if !pred(self, at, older) {
                break;
            }
            at = older;
        }
        out
    }
}

impl Default for ClosureBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tk(kind: TokenKind) -> Token {
        Token::new(kind)
    }

    fn ident(name: &str) -> Token {
        Token::with_text(TokenKind::Ident, name)
    }

    fn texts(buf: &ClosureBuffer) -> Vec<String> {
        buf.stream_to_vec().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn stream_starts_empty() {
        let buf = ClosureBuffer::new();
        assert!(buf.stream_to_vec().is_empty());
        assert_eq!(buf.closure_count(), 0);
    }

    #[test]
    fn push_back_and_materialize() {
        let mut buf = ClosureBuffer::new();
        buf.stream_push_back(ident("a"));
        buf.stream_push_back(tk(TokenKind::Plus));
        buf.stream_push_back(ident("b"));
        assert_eq!(texts(&buf), ["a", "+", "b"]);
    }

    #[test]
    fn insert_around_a_closure() {
        let mut buf = ClosureBuffer::new();
        buf.stream_push_back(ident("a"));
        buf.stream_push_back(tk(TokenKind::Plus));
        let plus = buf.push_back_closure(buf.last_streamed());
        buf.stream_push_back(ident("b"));

        buf.stream_insert_before_closure(plus, tk(TokenKind::LParen));
        buf.stream_insert_after_closure(plus, tk(TokenKind::RParen));
        assert_eq!(texts(&buf), ["a", "(", "+", ")", "b"]);
    }

    #[test]
    fn insert_before_first_token_via_sentinel_anchor() {
        let mut buf = ClosureBuffer::new();
        buf.stream_push_back(ident("x"));
        let x = buf.push_back_closure(buf.last_streamed());
        buf.stream_insert_before_closure(x, tk(TokenKind::LParen));
        assert_eq!(texts(&buf), ["(", "x"]);
    }

    #[test]
    fn closure_spans_survive_insertions_elsewhere() {
        let mut buf = ClosureBuffer::new();
        buf.stream_push_back(ident("a"));
        let a = buf.push_back_closure(buf.last_streamed());
        buf.stream_push_back(ident("b"));
        let b = buf.push_back_closure(buf.last_streamed());

        // Splicing around `a` must not disturb `b`'s span.
        buf.stream_insert_before_closure(a, tk(TokenKind::LParen));
        buf.stream_insert_after_closure(a, tk(TokenKind::RParen));
        assert_eq!(buf.front_token(b).text, "b");
        buf.stream_insert_after_closure(b, tk(TokenKind::RParen));
        assert_eq!(texts(&buf), ["(", "a", ")", "b", ")"]);
    }

    #[test]
    fn pop_closure_leaves_the_stream_alone() {
        let mut buf = ClosureBuffer::new();
        buf.stream_push_back(tk(TokenKind::Bang));
        buf.push_back_closure(buf.last_streamed());
        assert_eq!(buf.closure_count(), 1);
        buf.pop_closure();
        assert_eq!(buf.closure_count(), 0);
        assert_eq!(texts(&buf), ["!"]);
    }

    #[test]
    fn pop_closure_at_relinks_neighbours() {
        let mut buf = ClosureBuffer::new();
        buf.stream_push_back(tk(TokenKind::Plus));
        let first = buf.push_back_closure(buf.last_streamed());
        buf.stream_push_back(tk(TokenKind::Star));
        let second = buf.push_back_closure(buf.last_streamed());

        buf.pop_closure_at(first);
        assert_eq!(buf.closure_count(), 1);
        assert_eq!(buf.last_closure(), second);
        assert_eq!(buf.prev_closure(second), Some(ClosureId(0)));
    }

    #[test]
    fn openers_get_postfix_traits() {
        let mut buf = ClosureBuffer::new();
        buf.stream_push_back(tk(TokenKind::LBrace));
        let brace = buf.push_back_closure(buf.last_streamed());
        assert_eq!(buf.priority(brace), Priority::Postfix);
        assert_eq!(buf.arity(brace), Arity::Postfix);

        buf.stream_push_back(tk(TokenKind::Assign));
        let assign = buf.push_back_closure(buf.last_streamed());
        assert_eq!(buf.priority(assign), Priority::Assignment);
        assert_eq!(buf.arity(assign), Arity::Binary);
        assert_eq!(buf.assoc(assign), Assoc::Right);
    }

    #[test]
    fn reverse_consecutive_collects_the_run_and_breaker() {
        let mut buf = ClosureBuffer::new();
        for kind in [TokenKind::Plus, TokenKind::Bang, TokenKind::Bang] {
            buf.stream_push_back(tk(kind));
            buf.push_back_closure(buf.last_streamed());
        }
        let run = buf.find_closure_reverse_consecutive(|b, newer, older| {
            b.priority(newer) == b.priority(older) && b.arity(newer) == b.arity(older)
        });
        // Both bangs; the older bang breaks the run against `+` and is
        // still collected.
        assert_eq!(run.len(), 2);
        assert_eq!(buf.front_token(run[0]).kind, TokenKind::Bang);
        assert_eq!(buf.front_token(run[1]).kind, TokenKind::Bang);
    }

    #[test]
    fn reverse_consecutive_ignore_skips_tight_closures() {
        let mut buf = ClosureBuffer::new();
        for kind in [TokenKind::Plus, TokenKind::PlusPlus, TokenKind::Plus] {
            buf.stream_push_back(tk(kind));
            buf.push_back_closure(buf.last_streamed());
        }
        let run = buf.find_closure_reverse_consecutive_and_ignore(
            |b, newer, older| {
                b.priority(newer) == b.priority(older)
                    && b.arity(newer) == b.arity(older)
                    && b.assoc(newer) == b.assoc(older)
            },
            |b, id| matches!(b.priority(id), Priority::Postfix | Priority::Prefix),
        );
        // The increment closure is transparent: both `+` closures form
        // the run.
        assert_eq!(run.len(), 2);
        assert_eq!(buf.front_token(run[0]).kind, TokenKind::Plus);
        assert_eq!(buf.front_token(run[1]).kind, TokenKind::Plus);
    }
}
