//! Halo subgraph induction
//!
//! The subgraph induced by a list of non-halo vertices keeps, as its own halo, every vertex of
//! the parent that borders the list: non-selected non-halo vertices and parent halo vertices
//! alike. Since every neighbor of a selected vertex is kept, the induced degree of a selected
//! vertex is its parent degree, and the edge array of the induced graph is bounded by the one of
//! the parent.

use log::trace;

use crate::based::{try_vec, BasedVec};
use crate::defs::{Gnum, GNUM_NONE};
use crate::error::{Result, ScotchError};
use crate::graph::{Graph, VertList};
use crate::hgraph::Hgraph;

/// Edge load handling of the induction loop, resolved at compile time
trait InduceLoads {
    fn reserve(&mut self, edgenbr: usize) -> Result<()>;

    fn resize(&mut self, len: usize);

    /// Copy the load of parent arc `orgedge` to induced arc slot `pos`
    fn set(&mut self, pos: usize, orgedge: Gnum);

    fn copy(&mut self, dst: usize, src: usize);

    fn finish(self, baseval: Gnum) -> Option<BasedVec<Gnum>>;
}

struct NoLoads;

impl InduceLoads for NoLoads {
    #[inline]
    fn reserve(&mut self, _: usize) -> Result<()> {
        Ok(())
    }

    #[inline]
    fn resize(&mut self, _: usize) {}

    #[inline]
    fn set(&mut self, _: usize, _: Gnum) {}

    #[inline]
    fn copy(&mut self, _: usize, _: usize) {}

    fn finish(self, _: Gnum) -> Option<BasedVec<Gnum>> {
        None
    }
}

struct EdgeLoads<'a> {
    orgtax: &'a BasedVec<Gnum>,
    tab: Vec<Gnum>,
}

impl InduceLoads for EdgeLoads<'_> {
    fn reserve(&mut self, edgenbr: usize) -> Result<()> {
        self.tab.try_reserve_exact(edgenbr)?;
        Ok(())
    }

    #[inline]
    fn resize(&mut self, len: usize) {
        self.tab.resize(len, 0);
    }

    #[inline]
    fn set(&mut self, pos: usize, orgedge: Gnum) {
        self.tab[pos] = self.orgtax[orgedge];
    }

    #[inline]
    fn copy(&mut self, dst: usize, src: usize) {
        self.tab[dst] = self.tab[src];
    }

    fn finish(mut self, baseval: Gnum) -> Option<BasedVec<Gnum>> {
        self.tab.shrink_to_fit();
        Some(BasedVec::new(baseval, self.tab))
    }
}

impl Hgraph {
    /// Halo graph induced by the non-halo vertices of `list`
    ///
    /// `haloupper` bounds the number of halo vertices of the induced graph; it sizes the
    /// optimistic edge allocation. Induced vertex `baseval + i` is `list[i]`, halo vertices follow
    /// in order of discovery.
    pub fn induce_list(&self, list: &VertList, haloupper: Gnum) -> Result<Hgraph> {
        match &self.s.edlotax {
            None => self.induce2(list, haloupper, NoLoads),
            Some(orgtax) => self.induce2(list, haloupper, EdgeLoads { orgtax, tab: Vec::new() }),
        }
    }

    /// Exact number of arcs of the graph induced by `list`, halo arcs included
    fn induce3(&self, list: &VertList, orgindxtax: &BasedVec<Gnum>) -> Gnum {
        let mut edgenbr = 0;
        for &v in list.iter() {
            edgenbr += self.s.degree(v);
            edgenbr += self.s.neighbors(v).iter().filter(|&&u| orgindxtax[u] == GNUM_NONE).count()
                as Gnum;
        }
        edgenbr
    }

    fn induce2<L: InduceLoads>(
        &self,
        list: &VertList,
        haloupper: Gnum,
        mut loads: L,
    ) -> Result<Hgraph> {
        let orggraf = &self.s;
        let baseval = orggraf.baseval;
        let indvnohnbr = list.len() as Gnum;
        let indvnohnnd = baseval + indvnohnbr;
        let vertmax = (indvnohnbr + haloupper.max(0)) as usize;

        let mut orgindxtax = BasedVec::try_from_elem(baseval, GNUM_NONE, orggraf.vertnbr as usize)?;
        for (i, &v) in list.iter().enumerate() {
            orgindxtax[v] = baseval + i as Gnum;
        }

        let mut indverttab = try_vec(vertmax)?;
        let mut indvendtab = try_vec(vertmax)?;
        let mut indvnhdtab = try_vec(list.len())?;
        let mut indvnumtab = try_vec(vertmax)?;
        let mut indvelotab = orggraf.velotax.as_ref().map(|_| try_vec(vertmax)).transpose()?;

        /* Optimistic edge array size; exact count when it cannot be allocated */
        let edgeupper = (vertmax as Gnum * orggraf.degrmax).min(orggraf.edgenbr) as usize;
        let mut indedgetab: Vec<Gnum> = Vec::new();
        let reserved = indedgetab
            .try_reserve_exact(edgeupper)
            .map_err(ScotchError::from)
            .and_then(|_| loads.reserve(edgeupper));
        if reserved.is_err() {
            let edgenbr = self.induce3(list, &orgindxtax) as usize;
            trace!("induction falls back to exact edge count {edgenbr}");
            indedgetab = try_vec(edgenbr)?;
            loads.reserve(edgenbr)?;
        }

        let mut halodegtab: Vec<Gnum> = Vec::new();
        let mut halovnumtab: Vec<Gnum> = Vec::new();
        let mut halovelotab: Vec<Gnum> = Vec::new();
        let mut indvelosum = 0;
        let mut indenohnbr = 0;
        let mut indenlosum = 0;
        let mut edgenum = 0usize;
        for &v in list.iter() {
            let degr = orggraf.degree(v) as usize;
            indedgetab.resize(edgenum + degr, GNUM_NONE);
            loads.resize(edgenum + degr);
            indverttab.push(baseval + edgenum as Gnum);
            indvnumtab.push(orggraf.vnum(v));
            if let Some(tab) = &mut indvelotab {
                tab.push(orggraf.velo(v));
            }
            indvelosum += orggraf.velo(v);

            let mut front = edgenum;
            let mut back = edgenum + degr;
            for e in orggraf.adj(v) {
                let u = orggraf.edgetax[e];
                let mut indu = orgindxtax[u];
                if indu == GNUM_NONE {
                    indu = indvnohnnd + halodegtab.len() as Gnum;
                    orgindxtax[u] = indu;
                    halodegtab.push(0);
                    halovnumtab.push(orggraf.vnum(u));
                    halovelotab.push(orggraf.velo(u));
                }
                if indu < indvnohnnd {
                    indedgetab[front] = indu;
                    loads.set(front, e);
                    indenlosum += orggraf.edlo(e);
                    front += 1;
                } else {
                    back -= 1;
                    indedgetab[back] = indu;
                    loads.set(back, e);
                    halodegtab[(indu - indvnohnnd) as usize] += 1;
                }
            }
            indvnhdtab.push(baseval + front as Gnum);
            indenohnbr += (front - edgenum) as Gnum;
            edgenum += degr;
            indvendtab.push(baseval + edgenum as Gnum);
        }

        /* Halo vertices follow the listed ones, with their adjacency back to them */
        indvnumtab.extend_from_slice(&halovnumtab);
        if let Some(tab) = &mut indvelotab {
            tab.extend_from_slice(&halovelotab);
        }
        let halonbr = halodegtab.len();
        let mut halopostab = Vec::with_capacity(halonbr);
        for &degr in &halodegtab {
            halopostab.push(edgenum);
            indverttab.push(baseval + edgenum as Gnum);
            edgenum += degr as usize;
            indvendtab.push(baseval + edgenum as Gnum);
        }
        indedgetab.resize(edgenum, GNUM_NONE);
        loads.resize(edgenum);
        for i in 0..list.len() {
            let vnhd = (indvnhdtab[i] - baseval) as usize;
            let vend = (indvendtab[i] - baseval) as usize;
            for e in vnhd..vend {
                let h = (indedgetab[e] - indvnohnnd) as usize;
                let pos = halopostab[h];
                indedgetab[pos] = baseval + i as Gnum;
                loads.copy(pos, e);
                halopostab[h] += 1;
            }
        }
        indedgetab.shrink_to_fit();

        let mut s = Graph::from_parts(
            baseval,
            BasedVec::new(baseval, indverttab),
            BasedVec::new(baseval, indvendtab),
            BasedVec::new(baseval, indedgetab),
            indvelotab.map(|t| BasedVec::new(baseval, t)),
            loads.finish(baseval),
        );
        s.vnumtax = Some(BasedVec::new(baseval, indvnumtab));
        let indgraf = Hgraph {
            s,
            vnohnbr: indvnohnbr,
            vnohnnd: indvnohnnd,
            vnhdtax: BasedVec::new(baseval, indvnhdtab),
            vnlosum: indvelosum,
            enohnbr: indenohnbr,
            enlosum: indenlosum,
            levlnum: self.levlnum + 1,
        };

        #[cfg(debug_assertions)]
        indgraf.check()?;
        Ok(indgraf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_build::{graph_build, Grid2Gen};

    fn grid(dimx: Gnum, dimy: Gnum, baseval: Gnum) -> Hgraph {
        Hgraph::from_graph(graph_build(baseval, &mut Grid2Gen::new(dimx, dimy)).unwrap())
    }

    fn no_halo_arcs(graf: &Hgraph) -> bool {
        (graf.vnohnnd..graf.s.vertnnd)
            .all(|h| graf.s.neighbors(h).iter().all(|&u| u < graf.vnohnnd))
    }

    #[test]
    fn full_list_is_identity() {
        let orggraf = grid(4, 3, 1);
        let list = VertList::new(orggraf.s.vert_range().collect());
        let indgraf = orggraf.induce_list(&list, 0).unwrap();
        indgraf.check().unwrap();
        assert_eq!(indgraf.s.vertnbr, orggraf.s.vertnbr);
        assert_eq!(indgraf.vnohnbr, orggraf.vnohnbr);
        assert_eq!(indgraf.s.edgenbr, orggraf.s.edgenbr);
        assert_eq!(indgraf.levlnum, 1);
        for v in orggraf.s.vert_range() {
            let mut adj = indgraf.s.neighbors(v).to_vec();
            adj.sort_unstable();
            assert_eq!(adj, orggraf.s.neighbors(v));
            assert_eq!(indgraf.s.vnum(v), v);
        }
    }

    #[test]
    fn column_with_halo() {
        // 3x3 grid, keep the left column; the middle column becomes the halo
        let orggraf = grid(3, 3, 0);
        let list = VertList::new(vec![0, 3, 6]);
        let indgraf = orggraf.induce_list(&list, 3).unwrap();
        indgraf.check().unwrap();
        assert_eq!(indgraf.vnohnbr, 3);
        assert_eq!(indgraf.s.vertnbr, 6);
        assert_eq!(indgraf.enohnbr, 4);
        assert_eq!(indgraf.s.edgenbr, 4 + 2 * 3);
        let halo: Vec<Gnum> =
            (indgraf.vnohnnd..indgraf.s.vertnnd).map(|h| indgraf.s.vnum(h)).collect();
        assert_eq!(halo, vec![1, 4, 7]);
        let kept: Vec<Gnum> = indgraf.vnoh_range().map(|v| indgraf.s.vnum(v)).collect();
        assert_eq!(kept, vec![0, 3, 6]);
        assert!(no_halo_arcs(&indgraf));
        assert_eq!(indgraf.nohalo_neighbors(1), &[0, 2]);
    }

    #[test]
    fn listed_vertices_keep_their_loads() {
        let mut orggraf = grid(3, 3, 1);
        orggraf.s.velotax = Some(BasedVec::new(1, (1..=9).map(|v| 10 * v).collect()));
        orggraf.s.update_sums();
        orggraf.vnlosum = orggraf.s.velosum;
        let list = VertList::new(vec![9, 2, 5]);
        let indgraf = orggraf.induce_list(&list, 6).unwrap();
        indgraf.check().unwrap();
        for (i, &v) in list.iter().enumerate() {
            let indv = 1 + i as Gnum;
            assert_eq!(indgraf.s.vnum(indv), v);
            assert_eq!(indgraf.s.velo(indv), 10 * v);
        }
        for h in indgraf.vnohnnd..indgraf.s.vertnnd {
            assert_eq!(indgraf.s.velo(h), 10 * indgraf.s.vnum(h));
            assert!(!list.iter().any(|&v| v == indgraf.s.vnum(h)));
        }
        assert_eq!(indgraf.vnlosum, 10 * (9 + 2 + 5));
    }

    #[test]
    fn halo_of_halo_is_kept() {
        let orggraf = grid(4, 4, 0);
        let first = orggraf.induce_list(&VertList::new((0..8).collect()), 4).unwrap();
        // keep the bottom row; the second row and the old halo do not touch it
        let second = first.induce_list(&VertList::new(vec![4, 5, 6, 7]), 8).unwrap();
        second.check().unwrap();
        assert_eq!(second.vnohnbr, 4);
        assert_eq!(second.s.vertnbr, 8);
        let vnums: Vec<Gnum> =
            (second.vnohnnd..second.s.vertnnd).map(|h| second.s.vnum(h)).collect();
        assert_eq!(vnums, vec![0, 8, 1, 9, 2, 10, 3, 11]);
        assert_eq!(second.levlnum, 2);
        assert!(no_halo_arcs(&second));
    }

    #[test]
    fn exact_count_matches_induction() {
        let mut orggraf = grid(5, 4, 0);
        orggraf.s.edlotax = Some(BasedVec::new(0, (0..orggraf.s.edgenbr).map(|_| 3).collect()));
        orggraf.s.update_sums();
        orggraf.enlosum = orggraf.s.edlosum;
        let list = VertList::new(vec![0, 1, 2, 5, 6, 7, 12]);
        let mut orgindxtax = BasedVec::from_elem(0, GNUM_NONE, 20);
        for (i, &v) in list.iter().enumerate() {
            orgindxtax[v] = i as Gnum;
        }
        let indgraf = orggraf.induce_list(&list, 20).unwrap();
        indgraf.check().unwrap();
        assert_eq!(orggraf.induce3(&list, &orgindxtax), indgraf.s.edgenbr);
        assert_eq!(indgraf.s.edlosum, 3 * indgraf.s.edgenbr);
        assert!(no_halo_arcs(&indgraf));
    }
}
