//! Static mapping by recursive bipartitioning
//!
//! The graph is separated with a graph separation strategy while its target domain can be
//! split. Separator vertices are then given, one by one, to the side whose load is the lowest
//! with respect to the weight of its domain, and both sides are mapped recursively onto the two
//! subdomains.

use std::io::Write;

use log::{debug, info};

use crate::arch::Arch;
use crate::based::BasedVec;
use crate::defs::{Gnum, GraphPart, GNUM_NONE};
use crate::error::{inconsistent, Result};
use crate::graph::Graph;
use crate::strat::Strat;
use crate::vgraph::Vgraph;
use crate::vgraph_separate_st::{vgraph_separate_st, VgraphSeparate};

/// Terminal number of every vertex of a graph
#[derive(Clone, Debug)]
pub struct Mapping {
    pub parttax: BasedVec<Gnum>,
}

/// Quality figures of a mapping
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapStats {
    /// vertex load of every terminal
    pub loadtab: Vec<Gnum>,
    /// edges between vertices of different terminals
    pub cutnbr: Gnum,
    /// sum of edge loads times the distance between the terminals of their ends
    pub commload: Gnum,
    /// maximum load over average load, minus one
    pub imbalance: f64,
}

impl Mapping {
    /// Write the mapping as a vertex count followed by one `label terminal` line per vertex
    pub fn save(&self, graf: &Graph, mut writer: impl Write) -> Result<()> {
        writeln!(writer, "{}", graf.vertnbr)?;
        for v in graf.vert_range() {
            writeln!(writer, "{}\t{}", graf.vlbl(v), self.parttax[v])?;
        }
        Ok(())
    }

    pub fn stats<A: Arch>(&self, graf: &Graph, arch: &A) -> Result<MapStats> {
        let termnbr = arch.dom_size(&arch.dom_first());
        let mut loadtab = vec![0; termnbr as usize];
        let mut cutnbr = 0;
        let mut commload = 0;
        for v in graf.vert_range() {
            let t = self.parttax[v];
            if t < 0 || t >= termnbr {
                inconsistent!("vertex {v} mapped to invalid terminal {t}");
            }
            loadtab[t as usize] += graf.velo(v);
            let dom = arch.dom_term(t)?;
            for e in graf.adj(v) {
                let u = graf.edgetax[e];
                let tu = self.parttax[u];
                if tu != t {
                    cutnbr += 1;
                    commload += graf.edlo(e) * arch.dom_distance(&dom, &arch.dom_term(tu)?);
                }
            }
        }
        let avg = graf.velosum as f64 / termnbr as f64;
        let max = loadtab.iter().copied().max().unwrap_or(0);
        let imbalance = if avg > 0.0 { max as f64 / avg - 1.0 } else { 0.0 };
        Ok(MapStats { loadtab, cutnbr: cutnbr / 2, commload: commload / 2, imbalance })
    }
}

/// Give every separator vertex to the side of lowest relative load
fn graph_map_sepa<A: Arch>(grafptr: &mut Vgraph, arch: &A, doms: &(A::Dom, A::Dom)) {
    let weight = [arch.dom_weight(&doms.0), arch.dom_weight(&doms.1)];
    let mut load = [grafptr.compload[0], grafptr.compload[1]];
    let frontab = std::mem::take(&mut grafptr.frontab);
    for &v in &frontab {
        // load[0] / weight[0] <= load[1] / weight[1]
        let part = usize::from(load[0] * weight[1] > load[1] * weight[0]);
        grafptr.parttax[v] = part as GraphPart;
        load[part] += grafptr.s.velo(v);
    }
    grafptr.frontab = frontab;
}

fn graph_map_rec<A: Arch>(
    graf: &Graph,
    arch: &A,
    dom: &A::Dom,
    strat: &Strat<VgraphSeparate>,
    levlnum: Gnum,
    parttax: &mut BasedVec<Gnum>,
) -> Result<()> {
    if graf.vertnbr == 0 {
        return Ok(());
    }
    let Some(doms) = arch.dom_bipart(dom) else {
        let termnum = arch.dom_num(dom);
        for v in graf.vert_range() {
            parttax[graf.vnum(v)] = termnum;
        }
        return Ok(());
    };

    let mut grafdat = Vgraph::new(graf.clone())?;
    grafdat.levlnum = levlnum;
    vgraph_separate_st(&mut grafdat, strat)?;
    debug!(
        "level {levlnum}: parts {} / {}, separator {}",
        grafdat.compsize[0], grafdat.compsize[1], grafdat.fronnbr
    );
    graph_map_sepa(&mut grafdat, arch, &doms);

    let indgraf0 = graf.induce_part(&grafdat.parttax, 0)?;
    let indgraf1 = graf.induce_part(&grafdat.parttax, 1)?;
    drop(grafdat);
    graph_map_rec(&indgraf0, arch, &doms.0, strat, levlnum + 1, parttax)?;
    graph_map_rec(&indgraf1, arch, &doms.1, strat, levlnum + 1, parttax)
}

/*************************************************************************/
/* Map `graf` onto `arch`, separating with `strat`. Every vertex gets the
   number of the terminal it is mapped to. */
/*************************************************************************/
pub fn graph_map<A: Arch>(
    graf: &Graph,
    arch: &A,
    strat: &Strat<VgraphSeparate>,
) -> Result<Mapping> {
    let mut parttax = BasedVec::try_from_elem(graf.baseval, GNUM_NONE, graf.vertnbr as usize)?;
    graph_map_rec(graf, arch, &arch.dom_first(), strat, 0, &mut parttax)?;
    if let Some(v) = parttax.range().find(|&v| parttax[v] == GNUM_NONE) {
        inconsistent!("vertex {v} left unmapped");
    }
    let mapping = Mapping { parttax };
    info!("mapped {} vertices onto {} terminals", graf.vertnbr, arch.dom_size(&arch.dom_first()));
    Ok(mapping)
}
