//! Orderings and column block trees
//!
//! An [`Order`] holds the inverse permutation of an ordering, `peritab`, which gives for every
//! ordinal the original vertex ordered there, together with the tree of column blocks that
//! describes how the ordering was built. The leaves of the tree, read from left to right, are
//! consecutive ranges of ordinals.

use std::io::Write;

use crate::based::BasedVec;
use crate::defs::Gnum;
use crate::error::{inconsistent, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CblkType {
    /// leaf, or plain group of independent blocks
    #[default]
    Other,
    /// nested dissection node: part 0, part 1, then the separator when not empty
    Nested,
    /// chain of blocks, each one the father of the previous one
    Sequence,
    /// elimination forest, fathers given by `fathtab`
    Tree,
}

/// Node of the column block tree
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderCblk {
    pub typeval: CblkType,
    /// number of vertices in the block
    pub vnodnbr: Gnum,
    pub cblktab: Vec<OrderCblk>,
    /// for `Tree` blocks, index of the father of each child in `cblktab`, -1 for roots
    pub fathtab: Vec<Gnum>,
}

impl OrderCblk {
    pub fn leaf(vnodnbr: Gnum) -> Self {
        Self { vnodnbr, ..Default::default() }
    }

    pub fn is_leaf(&self) -> bool {
        self.cblktab.is_empty()
    }

    /// Number of leaf blocks in the subtree
    pub fn leaf_count(&self) -> Gnum {
        if self.is_leaf() {
            1
        } else {
            self.cblktab.iter().map(OrderCblk::leaf_count).sum()
        }
    }

    /// Number of nodes in the subtree
    pub fn node_count(&self) -> Gnum {
        1 + self.cblktab.iter().map(OrderCblk::node_count).sum::<Gnum>()
    }

    fn leaf_sizes(&self, out: &mut Vec<Gnum>) {
        if self.is_leaf() {
            out.push(self.vnodnbr);
        } else {
            for cblk in &self.cblktab {
                cblk.leaf_sizes(out);
            }
        }
    }

    /* Append the fathers of the leaves of the subtree, numbered from
       `treetab.len()`; `fathnum` is the father of the subtree root. */
    fn tree_fill(&self, treetab: &mut Vec<Gnum>, fathnum: Gnum) {
        if self.is_leaf() {
            treetab.push(fathnum);
            return;
        }
        let mut roottab = Vec::with_capacity(self.cblktab.len());
        let mut cblknum = treetab.len() as Gnum;
        for cblk in &self.cblktab {
            cblknum += cblk.leaf_count();
            roottab.push(cblknum - 1);
        }
        let last = self.cblktab.len() - 1;
        for (i, cblk) in self.cblktab.iter().enumerate() {
            let fath = match self.typeval {
                CblkType::Nested if self.cblktab.len() == 3 && i < 2 => roottab[2],
                CblkType::Sequence if i < last => roottab[i + 1],
                CblkType::Tree => match self.fathtab.get(i) {
                    Some(&f) if f >= 0 => roottab[f as usize],
                    _ => fathnum,
                },
                _ => fathnum,
            };
            cblk.tree_fill(treetab, fath);
        }
    }

    fn check(&self) -> Result<()> {
        if self.vnodnbr < 0 {
            inconsistent!("negative column block size {}", self.vnodnbr);
        }
        if self.is_leaf() {
            if self.typeval != CblkType::Other {
                inconsistent!("leaf column block of type {:?}", self.typeval);
            }
            return Ok(());
        }
        let vnodsum: Gnum = self.cblktab.iter().map(|c| c.vnodnbr).sum();
        if vnodsum != self.vnodnbr {
            inconsistent!("column block of {} vertices has children of {vnodsum}", self.vnodnbr);
        }
        match self.typeval {
            CblkType::Nested if !(2..=3).contains(&self.cblktab.len()) => {
                inconsistent!("nested dissection block with {} children", self.cblktab.len());
            }
            CblkType::Tree => {
                if self.fathtab.len() != self.cblktab.len() {
                    inconsistent!("tree block father table does not match its children");
                }
                for (i, &f) in self.fathtab.iter().enumerate() {
                    if f != -1 && (f <= i as Gnum || f >= self.cblktab.len() as Gnum) {
                        inconsistent!("child {i} of tree block has invalid father {f}");
                    }
                }
            }
            _ => {}
        }
        for cblk in &self.cblktab {
            cblk.check()?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct Order {
    pub baseval: Gnum,
    pub vnodnbr: Gnum,
    /// number of nodes of the column block tree
    pub treenbr: Gnum,
    /// number of leaf column blocks
    pub cblknbr: Gnum,
    pub rootcblk: OrderCblk,
    /// original vertex of every ordinal
    pub peritab: BasedVec<Gnum>,
}

impl Order {
    /// Empty ordering of `vnodnbr` vertices: one column block, no vertex ordered yet
    pub fn new(baseval: Gnum, vnodnbr: Gnum) -> Result<Order> {
        Ok(Order {
            baseval,
            vnodnbr,
            treenbr: 1,
            cblknbr: 1,
            rootcblk: OrderCblk::leaf(vnodnbr),
            peritab: BasedVec::try_from_elem(baseval, baseval - 1, vnodnbr as usize)?,
        })
    }

    /// Turn leaf `cblkptr` into a node of type `typeval` with leaf children of sizes `sizetab`
    pub fn split(&mut self, cblkptr: &mut OrderCblk, typeval: CblkType, sizetab: &[Gnum]) {
        debug_assert!(cblkptr.is_leaf());
        debug_assert_eq!(sizetab.iter().sum::<Gnum>(), cblkptr.vnodnbr);
        let k = sizetab.len() as Gnum;
        cblkptr.typeval = typeval;
        cblkptr.cblktab = sizetab.iter().map(|&n| OrderCblk::leaf(n)).collect();
        cblkptr.fathtab.clear();
        self.treenbr += k;
        self.cblknbr += k - 1;
    }

    /// Split every leaf of the subtree holding at least `2 * cblkmin` vertices into a sequence
    /// of blocks of at least `cblkmin` vertices
    pub fn split_blocks(&mut self, cblkptr: &mut OrderCblk, cblkmin: Gnum) {
        if !cblkptr.is_leaf() {
            for cblk in cblkptr.cblktab.iter_mut() {
                self.split_blocks(cblk, cblkmin);
            }
            return;
        }
        let cblkmin = cblkmin.max(1);
        if cblkptr.vnodnbr < 2 * cblkmin {
            return;
        }
        let cblknbr = cblkptr.vnodnbr / cblkmin;
        let sizetab: Vec<Gnum> = (0..cblknbr)
            .map(|i| cblkptr.vnodnbr / cblknbr + Gnum::from(i < cblkptr.vnodnbr % cblknbr))
            .collect();
        self.split(cblkptr, CblkType::Sequence, &sizetab);
    }

    /// Check the ordering: `peritab` is a permutation and the tree counters match the tree
    pub fn check(&self) -> Result<()> {
        let baseval = self.baseval;
        if self.peritab.range() != (baseval..baseval + self.vnodnbr) {
            inconsistent!("inverse permutation does not cover {} ordinals", self.vnodnbr);
        }
        let mut permtax = BasedVec::try_from_elem(baseval, false, self.vnodnbr as usize)?;
        for (i, &v) in self.peritab.enumerate() {
            if v < baseval || v >= baseval + self.vnodnbr {
                inconsistent!("ordinal {i} holds invalid vertex {v}");
            }
            if permtax[v] {
                inconsistent!("vertex {v} ordered twice");
            }
            permtax[v] = true;
        }
        if self.rootcblk.vnodnbr != self.vnodnbr {
            inconsistent!("root column block holds {} vertices", self.rootcblk.vnodnbr);
        }
        self.rootcblk.check()?;
        if self.rootcblk.leaf_count() != self.cblknbr || self.rootcblk.node_count() != self.treenbr
        {
            inconsistent!(
                "column block counters {}/{} do not match the tree",
                self.cblknbr,
                self.treenbr
            );
        }
        Ok(())
    }

    /// Direct permutation: ordinal of every vertex
    pub fn peri(&self) -> BasedVec<Gnum> {
        let mut permtax =
            BasedVec::from_elem(self.baseval, self.baseval - 1, self.vnodnbr as usize);
        for (i, &v) in self.peritab.enumerate() {
            permtax[v] = i;
        }
        permtax
    }

    /// First ordinal of every leaf column block, plus the end ordinal
    pub fn rang(&self) -> Vec<Gnum> {
        let mut sizetab = Vec::with_capacity(self.cblknbr as usize);
        self.rootcblk.leaf_sizes(&mut sizetab);
        let mut rangtab = Vec::with_capacity(sizetab.len() + 1);
        let mut ordenum = self.baseval;
        rangtab.push(ordenum);
        for size in sizetab {
            ordenum += size;
            rangtab.push(ordenum);
        }
        rangtab
    }

    /// Father of every leaf column block in the elimination tree, -1 for roots
    ///
    /// Block numbers start at `baseval`.
    pub fn tree(&self) -> Vec<Gnum> {
        let mut treetab = Vec::with_capacity(self.cblknbr as usize);
        self.rootcblk.tree_fill(&mut treetab, -1);
        for f in treetab.iter_mut().filter(|f| **f >= 0) {
            *f += self.baseval;
        }
        treetab
    }

    /// Column block of every ordinal, numbered from `baseval`
    fn cblk_of_ordinals(&self) -> BasedVec<Gnum> {
        let rangtab = self.rang();
        let mut cblktax = BasedVec::from_elem(self.baseval, 0, self.vnodnbr as usize);
        for (c, w) in rangtab.windows(2).enumerate() {
            for o in w[0]..w[1] {
                cblktax[o] = self.baseval + c as Gnum;
            }
        }
        cblktax
    }

    /// Write the ordering: vertex count, then one `label ordinal` line per vertex
    pub fn save(&self, vlbltax: Option<&BasedVec<Gnum>>, mut writer: impl Write) -> Result<()> {
        let permtax = self.peri();
        writeln!(writer, "{}", self.vnodnbr)?;
        for (v, &o) in permtax.enumerate() {
            writeln!(writer, "{}\t{}", vlbltax.map_or(v, |t| t[v]), o)?;
        }
        Ok(())
    }

    /// Write the column block of every vertex
    pub fn save_map(&self, vlbltax: Option<&BasedVec<Gnum>>, mut writer: impl Write) -> Result<()> {
        let permtax = self.peri();
        let cblktax = self.cblk_of_ordinals();
        writeln!(writer, "{}", self.vnodnbr)?;
        for (v, &o) in permtax.enumerate() {
            writeln!(writer, "{}\t{}", vlbltax.map_or(v, |t| t[v]), cblktax[o])?;
        }
        Ok(())
    }

    /// Write the father of the column block of every vertex
    pub fn save_tree(
        &self,
        vlbltax: Option<&BasedVec<Gnum>>,
        mut writer: impl Write,
    ) -> Result<()> {
        let permtax = self.peri();
        let cblktax = self.cblk_of_ordinals();
        let treetab = self.tree();
        writeln!(writer, "{}", self.vnodnbr)?;
        for (v, &o) in permtax.enumerate() {
            let fath = treetab[(cblktax[o] - self.baseval) as usize];
            writeln!(writer, "{}\t{}", vlbltax.map_or(v, |t| t[v]), fath)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ordering of 7 vertices: nested node with parts of 3 and 2 and a separator of 2
    fn nested7() -> Order {
        let mut order = Order::new(0, 7).unwrap();
        let mut root = std::mem::take(&mut order.rootcblk);
        order.split(&mut root, CblkType::Nested, &[3, 2, 2]);
        order.split(&mut root.cblktab[0], CblkType::Sequence, &[1, 2]);
        order.rootcblk = root;
        for (o, v) in [6, 5, 4, 3, 2, 1, 0].into_iter().enumerate() {
            order.peritab[o as Gnum] = v;
        }
        order
    }

    #[test]
    fn counters_follow_splits() {
        let order = nested7();
        order.check().unwrap();
        assert_eq!(order.cblknbr, 4);
        assert_eq!(order.treenbr, 6);
        assert_eq!(order.rang(), vec![0, 1, 3, 5, 7]);
    }

    #[test]
    fn tree_puts_separators_above_parts() {
        let order = nested7();
        // blocks: [1] [2] of part 0, part 1, separator
        assert_eq!(order.tree(), vec![1, 3, 3, -1]);

        let mut order = order;
        order.baseval = 1;
        order.peritab = BasedVec::new(1, (1..=7).collect());
        order.check().unwrap();
        assert_eq!(order.rang(), vec![1, 2, 4, 6, 8]);
        assert_eq!(order.tree(), vec![2, 4, 4, -1]);
    }

    #[test]
    fn check_catches_bad_permutations() {
        let mut order = nested7();
        order.peritab[3] = 6;
        assert!(order.check().is_err());
        let mut order = nested7();
        order.cblknbr = 3;
        assert!(order.check().is_err());
        let order = Order::new(0, 3).unwrap();
        assert!(order.check().is_err());
    }

    #[test]
    fn split_blocks_makes_sequences() {
        let mut order = Order::new(0, 11).unwrap();
        let mut root = std::mem::take(&mut order.rootcblk);
        order.split_blocks(&mut root, 3);
        order.rootcblk = root;
        order.peritab = BasedVec::new(0, (0..11).collect());
        order.check().unwrap();
        assert_eq!(order.rang(), vec![0, 4, 8, 11]);
        assert_eq!(order.tree(), vec![1, 2, -1]);
    }

    #[test]
    fn saves_permutation_and_blocks() {
        let order = nested7();
        let mut out = Vec::new();
        order.save(None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("7\n0\t6\n1\t5\n"));

        let mut out = Vec::new();
        order.save_map(None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        // vertex 6 is at ordinal 0, in block 0; vertex 0 is at ordinal 6, in the separator
        assert!(text.contains("\n6\t0\n"));
        assert!(text.contains("\n0\t3\n"));

        let mut out = Vec::new();
        order.save_tree(None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\n0\t-1\n"));
        assert!(text.contains("\n6\t1\n"));
    }
}
