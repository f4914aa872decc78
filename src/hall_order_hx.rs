//! Column blocks from a raw elimination forest
//!
//! Merged variables are attached to their principal variable, principal variables form the
//! elimination forest. Leaves are amalgamated into their father bottom-up while the merged block
//! stays small or the extra fill stays low with respect to the size of the father. The forest is
//! then walked in postorder, every block listing its variables, so that no variable is numbered
//! before its descendants.

use crate::defs::Gnum;
use crate::error::{inconsistent, Result};
use crate::hall_order_hd::HallOrder;
use crate::order::{CblkType, Order, OrderCblk};

/// Column blocks of an elimination, in elimination order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HallBlocks {
    /// variables in elimination order
    pub peritab: Vec<usize>,
    pub sizetab: Vec<Gnum>,
    /// father block of every block, -1 for roots
    pub fathtab: Vec<Gnum>,
}

impl HallBlocks {
    /// Record the blocks as children of leaf `cblkptr`, the first variable getting ordinal
    /// `ordenum`; `vnum` gives the original vertex of every variable
    pub fn apply(
        &self,
        ordeptr: &mut Order,
        cblkptr: &mut OrderCblk,
        ordenum: Gnum,
        vnum: impl Fn(usize) -> Gnum,
    ) {
        for (k, &v) in self.peritab.iter().enumerate() {
            ordeptr.peritab[ordenum + k as Gnum] = vnum(v);
        }
        if self.sizetab.len() > 1 {
            ordeptr.split(cblkptr, CblkType::Tree, &self.sizetab);
            cblkptr.fathtab.clone_from(&self.fathtab);
        }
    }
}

/// Principal variable of `i`, following merge links
fn hall_principal(ord: &HallOrder, mut i: usize) -> Result<usize> {
    let n = ord.nvtab.len();
    let mut steps = 0;
    while ord.nvtab[i] == 0 {
        let f = ord.fathtab[i];
        if f < 0 || f as usize >= n || steps > n {
            inconsistent!("merged variable {i} has no principal variable");
        }
        i = f as usize;
        steps += 1;
    }
    Ok(i)
}

/*************************************************************************/
/* Amalgamate and walk the forest. Leaves are merged into their father
   when the result holds at most `colmax` variables and either holds
   fewer than `colmin` variables or adds little fill, `fillrat` bounding
   the ratio of extra fill to the squared father column height. */
/*************************************************************************/
pub fn hall_order_hx_build(
    ord: &HallOrder,
    colmin: Gnum,
    colmax: Gnum,
    fillrat: f64,
) -> Result<HallBlocks> {
    let n = ord.nvtab.len();
    if ord.fathtab.len() != n || ord.degrtab.len() != n {
        inconsistent!("elimination arrays of different sizes");
    }

    let mut blktab: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut fathtab: Vec<Gnum> = vec![-1; n];
    for i in 0..n {
        let p = hall_principal(ord, i)?;
        if p == i {
            blktab[i].insert(0, i);
            let f = ord.fathtab[i];
            if f >= 0 {
                if f as usize >= n {
                    inconsistent!("variable {i} has invalid father {f}");
                }
                fathtab[i] = hall_principal(ord, f as usize)? as Gnum;
            }
        } else {
            blktab[p].push(i);
        }
    }

    let mut sizetab = ord.nvtab.clone();
    let mut chldtab: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in (0..n).filter(|&i| ord.nvtab[i] > 0) {
        if fathtab[i] >= 0 {
            chldtab[fathtab[i] as usize].push(i);
        }
    }
    let mut cnttab: Vec<usize> = chldtab.iter().map(Vec::len).collect();
    let mut alivetab: Vec<bool> = ord.nvtab.iter().map(|&nv| nv > 0).collect();

    /* Bottom-up amalgamation; a node is visited once all its children are */
    let mut worktab: Vec<usize> =
        (0..n).rev().filter(|&i| alivetab[i] && cnttab[i] == 0).collect();
    while let Some(l) = worktab.pop() {
        let f = fathtab[l];
        if f < 0 {
            continue;
        }
        let f = f as usize;
        let (nvl, nvf) = (sizetab[l], sizetab[f]);
        let fdeg = ord.degrtab[f] + nvf;
        let ldeg = ord.degrtab[l] + nvl;
        let fill = nvl * (fdeg - ldeg + nvl);
        if nvf + nvl <= colmax
            && (nvf + nvl < colmin || ((2 * fill) as f64) < fillrat * (fdeg * fdeg) as f64)
        {
            let mut merged = std::mem::take(&mut blktab[l]);
            merged.append(&mut blktab[f]);
            blktab[f] = merged;
            sizetab[f] += nvl;
            alivetab[l] = false;
            let lchld = std::mem::take(&mut chldtab[l]);
            for &c in &lchld {
                fathtab[c] = f as Gnum;
            }
            if let Some(pos) = chldtab[f].iter().position(|&c| c == l) {
                chldtab[f].splice(pos..=pos, lchld);
            }
        }
        cnttab[f] -= 1;
        if cnttab[f] == 0 {
            worktab.push(f);
        }
    }

    /* Postorder walk with an explicit stack */
    let mut blocks = HallBlocks::default();
    let mut blocknum: Vec<Gnum> = vec![-1; n];
    let mut emitted = Vec::new();
    for root in (0..n).filter(|&i| alivetab[i] && fathtab[i] < 0) {
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some(top) = stack.last_mut() {
            let node = top.0;
            if let Some(&c) = chldtab[node].get(top.1) {
                top.1 += 1;
                stack.push((c, 0));
                continue;
            }
            stack.pop();
            blocknum[node] = blocks.sizetab.len() as Gnum;
            blocks.sizetab.push(sizetab[node]);
            blocks.peritab.extend_from_slice(&blktab[node]);
            emitted.push(node);
        }
    }
    blocks.fathtab = emitted
        .iter()
        .map(|&node| match fathtab[node] {
            f if f < 0 => -1,
            f => blocknum[f as usize],
        })
        .collect();

    if blocks.peritab.len() != n {
        inconsistent!("column blocks hold {} of {n} variables", blocks.peritab.len());
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_build::{graph_build, Grid2Gen};
    use crate::hall_order_hd::{hall_order_hd, HallGraph, HallScore};

    fn grid_hall(dimx: Gnum, dimy: Gnum) -> HallGraph {
        let graf = graph_build(0, &mut Grid2Gen::new(dimx, dimy)).unwrap();
        HallGraph {
            vnohnbr: graf.vertnbr as usize,
            vartab: graf
                .vert_range()
                .map(|v| graf.neighbors(v).iter().map(|&u| u as usize).collect())
                .collect(),
            elmtab: Vec::new(),
        }
    }

    #[test]
    fn fathers_come_after_their_children() {
        let ord = hall_order_hd(grid_hall(5, 4), HallScore::Degree).unwrap();
        let blocks = hall_order_hx_build(&ord, 0, 100000, 0.08).unwrap();
        let mut seen = vec![false; 20];
        for &v in &blocks.peritab {
            assert!(!seen[v]);
            seen[v] = true;
        }
        assert_eq!(blocks.sizetab.iter().sum::<Gnum>(), 20);
        for (i, &f) in blocks.fathtab.iter().enumerate() {
            assert!(f == -1 || f > i as Gnum);
        }
        assert_eq!(blocks.fathtab.iter().filter(|&&f| f == -1).count(), 1);
    }

    #[test]
    fn amalgamation_grows_with_fill_ratio() {
        let ord = hall_order_hd(grid_hall(6, 6), HallScore::Fill).unwrap();
        let principals = ord.nvtab.iter().filter(|&&nv| nv > 0).count();
        let none = hall_order_hx_build(&ord, 0, 100000, 0.0).unwrap();
        let some = hall_order_hx_build(&ord, 0, 100000, 0.08).unwrap();
        let all = hall_order_hx_build(&ord, 0, 100000, 1e9).unwrap();
        assert_eq!(none.sizetab.len(), principals);
        assert!(some.sizetab.len() <= none.sizetab.len());
        assert!(all.sizetab.len() <= some.sizetab.len());
        assert_eq!(all.sizetab.len(), 1);
    }

    #[test]
    fn small_blocks_are_merged_up_to_colmax() {
        let ord = hall_order_hd(grid_hall(4, 4), HallScore::Degree).unwrap();
        let blocks = hall_order_hx_build(&ord, 17, 16, 0.0).unwrap();
        assert_eq!(blocks.sizetab, vec![16]);
        let nvmax = ord.nvtab.iter().copied().max().unwrap();
        let blocks = hall_order_hx_build(&ord, 100, 3, 0.0).unwrap();
        assert!(blocks.sizetab.iter().all(|&s| s <= nvmax.max(3)));
    }

    #[test]
    fn apply_writes_a_tree_block() {
        let ord =
            HallOrder { nvtab: vec![1, 2, 0], fathtab: vec![1, -1, 1], degrtab: vec![2, 0, 0] };
        let blocks = hall_order_hx_build(&ord, 0, 100, 0.0).unwrap();
        assert_eq!(blocks.peritab, vec![0, 1, 2]);
        assert_eq!(blocks.sizetab, vec![1, 2]);
        assert_eq!(blocks.fathtab, vec![1, -1]);

        let mut order = Order::new(1, 3).unwrap();
        let mut root = std::mem::take(&mut order.rootcblk);
        blocks.apply(&mut order, &mut root, 1, |v| v as Gnum + 1);
        order.rootcblk = root;
        order.check().unwrap();
        assert_eq!(order.cblknbr, 2);
        assert_eq!(order.rootcblk.typeval, CblkType::Tree);
        assert_eq!(order.tree(), vec![2, -1]);
    }
}
