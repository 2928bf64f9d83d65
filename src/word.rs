use crate::Symbol;

/// A finite word over some [`Symbol`] type: an ordered sequence that can be indexed by position
/// and queried for its length. The tester only ever reads words, either letter by letter during
/// exact simulation or through randomly placed slices.
///
/// Implementations exist for slices, arrays, vectors, [`str`]/[`String`] (with `char` symbols)
/// and references to any of these.
pub trait FiniteWord {
    /// The type of symbol the word is made of.
    type Symbol: Symbol;

    /// Returns the symbol at `position`, if the word is long enough.
    fn nth(&self, position: usize) -> Option<Self::Symbol>;

    /// The number of symbols in the word.
    fn len(&self) -> usize;

    /// Whether the word is the empty word ε.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the symbols of the word, front to back.
    fn symbols(&self) -> Symbols<'_, Self> {
        Symbols {
            word: self,
            position: 0,
        }
    }
}

/// Iterator over the symbols of a [`FiniteWord`], produced by [`FiniteWord::symbols`].
pub struct Symbols<'a, W: FiniteWord + ?Sized> {
    word: &'a W,
    position: usize,
}

impl<'a, W: FiniteWord + ?Sized> Iterator for Symbols<'a, W> {
    type Item = W::Symbol;

    fn next(&mut self) -> Option<Self::Item> {
        let out = self.word.nth(self.position);
        self.position += 1;
        out
    }
}

impl<S: Symbol> FiniteWord for [S] {
    type Symbol = S;

    fn nth(&self, position: usize) -> Option<S> {
        self.get(position).copied()
    }

    fn len(&self) -> usize {
        <[S]>::len(self)
    }
}

impl<S: Symbol, const N: usize> FiniteWord for [S; N] {
    type Symbol = S;

    fn nth(&self, position: usize) -> Option<S> {
        self.get(position).copied()
    }

    fn len(&self) -> usize {
        N
    }
}

impl<S: Symbol> FiniteWord for Vec<S> {
    type Symbol = S;

    fn nth(&self, position: usize) -> Option<S> {
        self.get(position).copied()
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl FiniteWord for str {
    type Symbol = char;

    fn nth(&self, position: usize) -> Option<char> {
        self.chars().nth(position)
    }

    fn len(&self) -> usize {
        self.chars().count()
    }
}

impl FiniteWord for String {
    type Symbol = char;

    fn nth(&self, position: usize) -> Option<char> {
        self.chars().nth(position)
    }

    fn len(&self) -> usize {
        self.chars().count()
    }
}

impl<W: FiniteWord + ?Sized> FiniteWord for &W {
    type Symbol = W::Symbol;

    fn nth(&self, position: usize) -> Option<Self::Symbol> {
        W::nth(self, position)
    }

    fn len(&self) -> usize {
        W::len(self)
    }
}
