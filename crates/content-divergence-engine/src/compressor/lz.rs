//! Greedy LZ77 tokenization over a dictionary-primed window.
//!
//! The window is the dictionary content followed by the data. Back-references
//! may point into the dictionary, but only data positions produce tokens. The
//! search is fully deterministic: hash chains are walked most-recent first and
//! a candidate replaces the current best only if it is strictly longer.

/// Shortest back-reference worth emitting.
pub(crate) const MIN_MATCH: usize = 3;
/// Longest back-reference DEFLATE can express.
pub(crate) const MAX_MATCH: usize = 258;
/// Farthest back-reference DEFLATE can express.
pub(crate) const MAX_DISTANCE: usize = 32 * 1024;

const HASH_BITS: u32 = 15;
const HASH_SIZE: usize = 1 << HASH_BITS;
const NIL: usize = usize::MAX;

/// One LZ77 output unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    /// A byte copied verbatim.
    Literal(u8),
    /// Copy `length` bytes starting `distance` bytes back.
    Match { length: u16, distance: u16 },
}

/// Hash-chain match finder.
#[derive(Debug, Clone)]
pub(crate) struct MatchFinder {
    max_chain: usize,
}

impl MatchFinder {
    pub(crate) fn new(max_chain: usize) -> Self {
        Self {
            max_chain: max_chain.max(1),
        }
    }

    /// Tokenize `data`, allowing references into `dictionary`.
    pub(crate) fn tokenize(&self, dictionary: &[u8], data: &[u8]) -> Vec<Token> {
        // Only the last window's worth of dictionary is reachable.
        let dictionary = &dictionary[dictionary.len().saturating_sub(MAX_DISTANCE)..];
        let window: Vec<u8> = [dictionary, data].concat();
        let start = dictionary.len();

        let mut head = vec![NIL; HASH_SIZE];
        let mut prev = vec![NIL; window.len()];
        let insert = |head: &mut Vec<usize>, prev: &mut Vec<usize>, pos: usize| {
            if pos + MIN_MATCH <= window.len() {
                let h = hash3(&window[pos..pos + MIN_MATCH]);
                prev[pos] = head[h];
                head[h] = pos;
            }
        };

        for pos in 0..start {
            insert(&mut head, &mut prev, pos);
        }

        let mut tokens = Vec::with_capacity(data.len() / 2);
        let mut pos = start;
        while pos < window.len() {
            let (length, distance) = self.longest_match(&window, &head, &prev, pos);
            if length >= MIN_MATCH {
                tokens.push(Token::Match {
                    length: length as u16,
                    distance: distance as u16,
                });
                for p in pos..pos + length {
                    insert(&mut head, &mut prev, p);
                }
                pos += length;
            } else {
                tokens.push(Token::Literal(window[pos]));
                insert(&mut head, &mut prev, pos);
                pos += 1;
            }
        }
        tokens
    }

    fn longest_match(
        &self,
        window: &[u8],
        head: &[usize],
        prev: &[usize],
        pos: usize,
    ) -> (usize, usize) {
        let limit = (window.len() - pos).min(MAX_MATCH);
        if limit < MIN_MATCH {
            return (0, 0);
        }

        let mut best_length = 0;
        let mut best_distance = 0;
        let mut candidate = head[hash3(&window[pos..pos + MIN_MATCH])];
        let mut steps = 0;

        while candidate != NIL && steps < self.max_chain {
            let distance = pos - candidate;
            if distance > MAX_DISTANCE {
                break;
            }
            let length = window[candidate..]
                .iter()
                .zip(&window[pos..pos + limit])
                .take_while(|(a, b)| a == b)
                .count();
            if length > best_length {
                best_length = length;
                best_distance = distance;
                if length == limit {
                    break;
                }
            }
            candidate = prev[candidate];
            steps += 1;
        }
        (best_length, best_distance)
    }
}

fn hash3(bytes: &[u8]) -> usize {
    let v = (u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2]);
    (v.wrapping_mul(0x9E37_79B1) >> (32 - HASH_BITS)) as usize
}

/// Rebuild data from tokens over a window primed with `dictionary`.
#[cfg(test)]
pub(crate) fn expand(dictionary: &[u8], tokens: &[Token]) -> Vec<u8> {
    let mut out = dictionary.to_vec();
    for token in tokens {
        match *token {
            Token::Literal(b) => out.push(b),
            Token::Match { length, distance } => {
                let from = out.len() - distance as usize;
                for i in 0..length as usize {
                    out.push(out[from + i]);
                }
            }
        }
    }
    out.split_off(dictionary.len())
}
