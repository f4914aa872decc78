//! Graph and mesh ordering by multilevel nested dissection
//!
//! Orderings are driven by strategy strings: a small language naming the methods to apply and
//! their parameters, with conditions on the structure being processed. Graphs are ordered as
//! halo graphs and meshes as halo meshes, so that every recursive subproblem keeps track of its
//! border.

#![allow(clippy::needless_range_loop, clippy::too_many_arguments)]

#[macro_use]
extern crate macros;

pub mod based;
pub mod defs;
pub mod error;

pub mod strat;
pub mod strat_parser;

pub mod graph;
pub mod graph_build;
pub mod graph_coarsen;
pub mod graph_io;
pub mod hgraph;
mod hgraph_induce;
pub mod mesh;
pub mod mesh_coarsen;
pub mod mesh_io;
pub mod hmesh;
mod hmesh_induce;
pub mod order;
pub(crate) mod pqueue;

pub mod vgraph;
pub mod vgraph_separate_fm;
pub mod vgraph_separate_gg;
pub mod vgraph_separate_ml;
pub mod vgraph_separate_st;
pub mod vgraph_separate_th;

pub mod vmesh;
pub mod vmesh_separate_fm;
pub mod vmesh_separate_gg;
pub mod vmesh_separate_gr;
pub mod vmesh_separate_ml;
pub mod vmesh_separate_st;

pub mod hall_order_hd;
pub mod hall_order_hx;

pub mod hgraph_order_bl;
pub mod hgraph_order_hx;
pub mod hgraph_order_nd;
pub mod hgraph_order_si;
pub mod hgraph_order_st;

pub mod hmesh_order_bl;
pub mod hmesh_order_gr;
pub mod hmesh_order_hx;
pub mod hmesh_order_nd;
pub mod hmesh_order_si;
pub mod hmesh_order_st;

pub mod arch;
pub mod graph_map;
pub mod library;

pub use error::{Result, ScotchError};
pub use library::{graph_order, mesh_order};

#[cfg(test)]
mod tests;
