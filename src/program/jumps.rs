//! Bracket jump table
//!
//! Each matched `[` maps to its `]` and each matched `]` back to its `[`. The table is
//! built in one stack pass at load time, which yields exactly the partner a depth-tracking
//! linear scan would find. Brackets without a partner have no entry; the engine reports
//! them when it first needs to jump.

use super::instruction::Instruction;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct JumpTable {
    partners: FxHashMap<usize, usize>,
}

impl JumpTable {
    pub fn build(instructions: &[Instruction]) -> Self {
        let mut partners = FxHashMap::default();
        let mut open: Vec<usize> = Vec::new();

        for (index, instruction) in instructions.iter().enumerate() {
            match instruction {
                Instruction::LoopStart => open.push(index),
                Instruction::LoopEnd => {
                    // A `]` with nothing open stays unmatched
                    if let Some(start) = open.pop() {
                        partners.insert(start, index);
                        partners.insert(index, start);
                    }
                }
                _ => {}
            }
        }

        JumpTable { partners }
    }

    /// Position of the bracket paired with the one at `index`
    pub fn partner(&self, index: usize) -> Option<usize> {
        self.partners.get(&index).copied()
    }

    /// Number of matched pairs
    pub fn pairs(&self) -> usize {
        self.partners.len() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(source: &str) -> JumpTable {
        let instructions: Vec<Instruction> =
            source.chars().filter_map(Instruction::from_char).collect();
        JumpTable::build(&instructions)
    }

    #[test]
    fn nested_pairs_resolve_to_their_own_level() {
        let jumps = table("[[+]-]");
        assert_eq!(jumps.partner(0), Some(5));
        assert_eq!(jumps.partner(5), Some(0));
        assert_eq!(jumps.partner(1), Some(3));
        assert_eq!(jumps.partner(3), Some(1));
        assert_eq!(jumps.partner(2), None);
        assert_eq!(jumps.pairs(), 2);
    }

    #[test]
    fn sibling_loops_do_not_cross() {
        let jumps = table("[-][+]");
        assert_eq!(jumps.partner(0), Some(2));
        assert_eq!(jumps.partner(3), Some(5));
    }

    #[test]
    fn unmatched_brackets_have_no_partner() {
        let jumps = table("[]]");
        assert_eq!(jumps.partner(0), Some(1));
        assert_eq!(jumps.partner(2), None);

        let jumps = table("[[]");
        assert_eq!(jumps.partner(0), None);
        assert_eq!(jumps.partner(1), Some(2));
    }
}
