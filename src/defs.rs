//! Common integer type and library-wide constants

/// Integer type of every vertex, edge, load and ordinal value
pub type Gnum = i64;

/// Part tag of a vertex in a separation state: 0, 1, or 2 for the separator
pub type GraphPart = u8;

/// Marker for an unset entry of an index table
pub const GNUM_NONE: Gnum = -1;

/// Seed of the pseudo-random generator used by matchings and seeded growing
pub const RANDOM_SEED: u64 = 4321;

/// Default vertex floor of multilevel coarsening
pub const COARSEN_VERT_DEFAULT: Gnum = 100;

/// Default coarsening ratio above which a coarsening level is considered useless
pub const COARSEN_RAT_DEFAULT: f64 = 0.8;

/// Maximum load of a multinode, relative to the average load of a coarse vertex at the floor
pub const COARSEN_MAXLOAD_FACTOR: f64 = 1.5;

/// Default fill ratio of halo minimum degree/fill amalgamation
pub const HALL_FILLRAT_DEFAULT: f64 = 0.08;

/// Default maximum column block size of halo minimum degree/fill amalgamation
pub const HALL_COLMAX_DEFAULT: Gnum = 100000;

/// Default imbalance ratio of separator refinement
pub const SEPARATE_BAL_DEFAULT: f64 = 0.1;
