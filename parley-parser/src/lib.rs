#![no_std]

/*!
Low-level classification of command-line tokens. Takes care of distinctions
between option-looking tokens, positionals, and the `--` terminator, given a
set of prefix characters. No knowledge of registered options happens here;
whether `-x` is a known option, an abbreviation, or a negative number is
decided by the caller. Usually this is too low level to use directly.
*/

use core::fmt::{self, Debug};

/**
The set of characters that may introduce an option, such as `-` or `-+`.

A token is *long* when its first two characters are both prefix characters
(`--foo`, `++foo`, `-+foo`), and *short* when only the first one is.
*/
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Prefixes<'p> {
    chars: &'p str,
}

impl<'p> Prefixes<'p> {
    /// The conventional `-` prefix.
    pub const DASH: Prefixes<'static> = Prefixes { chars: "-" };

    /// Create a new prefix set. An empty string falls back to `-`.
    #[inline]
    #[must_use]
    pub const fn new(chars: &'p str) -> Self {
        if chars.is_empty() {
            Prefixes { chars: "-" }
        } else {
            Prefixes { chars }
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'p str {
        self.chars
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(c)
    }

    /// The character used to build automatic options like `-h`: `-` if it's
    /// one of the prefixes, otherwise the first prefix.
    #[must_use]
    pub fn primary(&self) -> char {
        if self.contains('-') {
            '-'
        } else {
            self.chars.chars().next().unwrap_or('-')
        }
    }

    /// True if `text` begins with one of the prefix characters.
    #[inline]
    #[must_use]
    pub fn starts(&self, text: &str) -> bool {
        text.chars().next().is_some_and(|c| self.contains(c))
    }

    /// Strip every leading prefix character from `text`.
    #[inline]
    #[must_use]
    pub fn trim<'t>(&self, text: &'t str) -> &'t str {
        text.trim_start_matches(|c| self.contains(c))
    }
}

impl Debug for Prefixes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prefixes({:?})", self.chars)
    }
}

/**
A token that lexically looks like an option: it starts with a prefix
character and is longer than one character.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawOption<'arg> {
    text: &'arg str,
    long: bool,
}

impl<'arg> RawOption<'arg> {
    /// The whole token, prefix characters included.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &'arg str {
        self.text
    }

    /// True for `--foo` style tokens.
    #[inline]
    #[must_use]
    pub fn is_long(&self) -> bool {
        self.long
    }

    /// Split `--option=value` into `("--option", "value")`. Returns [`None`]
    /// if there is no `=` in the token.
    #[inline]
    #[must_use]
    pub fn split_value(&self) -> Option<(&'arg str, &'arg str)> {
        split_once(self.text, b'=')
    }

    /**
    Split a short token like `-xyz` into the two-character option `-x` and
    whatever follows it (`yz`). The remainder may be empty. Returns [`None`]
    for long tokens.
    */
    #[must_use]
    pub fn split_short(&self) -> Option<(&'arg str, &'arg str)> {
        if self.long {
            return None;
        }

        let mut indices = self.text.char_indices().skip(1);
        let (_, flag) = indices.next()?;
        let end = 1 + flag.len_utf8();
        Some(self.text.split_at(end))
    }
}

/**
A single classified token.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'arg> {
    /// A plain value, or anything after a `--` terminator.
    Positional(&'arg str),

    /// The first bare `--`. Every token after it is positional.
    Terminator,

    /// Something that looks like an option.
    Option(RawOption<'arg>),
}

/**
The [`Tokenizer`] type operates by passing tokens it finds into a
[`Visitor`], to be handled.
*/
pub trait Visitor<'arg> {
    type Value;

    /// A positional token.
    fn visit_positional(self, argument: &'arg str) -> Self::Value;

    /// The `--` terminator.
    fn visit_terminator(self) -> Self::Value;

    /// An option-looking token, such as `--option`, `--option=value`, `-o`,
    /// or `-ovalue`.
    fn visit_option(self, option: RawOption<'arg>) -> Self::Value;
}

struct TokenVisitor;

impl<'arg> Visitor<'arg> for TokenVisitor {
    type Value = Token<'arg>;

    #[inline]
    fn visit_positional(self, argument: &'arg str) -> Self::Value {
        Token::Positional(argument)
    }

    #[inline]
    fn visit_terminator(self) -> Self::Value {
        Token::Terminator
    }

    #[inline]
    fn visit_option(self, option: RawOption<'arg>) -> Self::Value {
        Token::Option(option)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ready,
    PositionalOnly,
}

/**
A `Tokenizer` is the main entry point into `parley_parser`. It classifies
tokens in each call to `next_token`, sending them to the given [`Visitor`].
It handles the `--` terminator, after which every token is positional, and
decides which tokens look like options for the configured [`Prefixes`].

[parley-parser][crate] operates entirely on borrowed data; the `'arg`
lifetime refers to the borrowed command line.
*/
#[derive(Debug, Clone)]
pub struct Tokenizer<'p, I> {
    prefixes: Prefixes<'p>,
    state: State,
    args: I,
}

impl<'p, 'arg, I> Tokenizer<'p, I>
where
    I: Iterator<Item = &'arg str>,
{
    /**
    Create a new [`Tokenizer`] from an iterator of string slices. This list
    should *exclude* the name of the program.
    */
    #[inline]
    #[must_use]
    pub fn new(prefixes: Prefixes<'p>, args: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            prefixes,
            state: State::Ready,
            args: args.into_iter(),
        }
    }

    pub fn next_token<V>(&mut self, visitor: V) -> Option<V::Value>
    where
        V: Visitor<'arg>,
    {
        let argument = self.args.next()?;

        Some(match self.state {
            State::PositionalOnly => visitor.visit_positional(argument),
            State::Ready if argument == "--" => {
                self.state = State::PositionalOnly;
                visitor.visit_terminator()
            }
            State::Ready => {
                let mut chars = argument.chars();
                match (chars.next(), chars.next()) {
                    (Some(first), Some(second)) if self.prefixes.contains(first) => {
                        visitor.visit_option(RawOption {
                            text: argument,
                            long: self.prefixes.contains(second),
                        })
                    }
                    _ => visitor.visit_positional(argument),
                }
            }
        })
    }
}

impl<'arg, I> Iterator for Tokenizer<'_, I>
where
    I: Iterator<Item = &'arg str>,
{
    type Item = Token<'arg>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.next_token(TokenVisitor)
    }
}

/**
True if `text` looks like a negative number: `-1`, `-12`, `-.5`, or `-3.25`.
Such tokens are positional unless the parser itself has options that look
like negative numbers.
*/
#[must_use]
pub fn is_negative_number(text: &str) -> bool {
    let Some(rest) = text.strip_prefix('-') else {
        return false;
    };

    let (whole, fraction) = match split_once(rest, b'.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (rest, None),
    };

    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    match fraction {
        None => !whole.is_empty() && digits(whole),
        Some(fraction) => !fraction.is_empty() && digits(whole) && digits(fraction),
    }
}

fn split_once(input: &str, delimiter: u8) -> Option<(&str, &str)> {
    // The delimiter is ASCII, so both halves land on char boundaries.
    memchr::memchr(delimiter, input.as_bytes()).map(|i| (&input[..i], &input[i + 1..]))
}
