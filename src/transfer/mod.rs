//! transfer — parameter records, transfer functions and the transfer bundle.
//!
//! Purpose
//! -------
//! Map a small set of physical parameters (decoherence, clustering μ,
//! lensing Σ, coherence length) to scale- and redshift-dependent
//! modification amplitudes, and bundle them with the fixed constants the
//! spectrum modulator needs.
//!
//! Key behaviors
//! -------------
//! - [`params`]: plain `Copy` records with GR-limit defaults, plus the
//!   [`ClusteringModel`](params::ClusteringModel) sum type over the
//!   continuous and binned μ parameterizations.
//! - [`functions`]: pure scalar functions and `ndarray` broadcasting
//!   variants. No function here can fail.
//! - [`bundle`]: [`TransferBundle`](bundle::TransferBundle) and the
//!   validated [`ModulationConfig`](bundle::ModulationConfig).
//!
//! Invariants & assumptions
//! ------------------------
//! - The decoherence rate is suppressed at early times for positive
//!   steepness so that early-universe physics is untouched.
//! - Every weight produced by `scale_redshift_weight` lies in [0, 1].
//!
//! Testing notes
//! -------------
//! - Unit tests in each submodule check bounds, limits and monotonicity;
//!   the GR-recovery property of the whole pipeline is tested in
//!   `spectra::modulator` and in the integration tests.

pub mod bundle;
pub mod errors;
pub mod functions;
pub mod params;

pub use self::bundle::{ModulationConfig, TransferBundle};
pub use self::errors::{TransferError, TransferResult};
pub use self::functions::{
    clustering_modifier, clustering_modifier_array, clustering_modifier_binned,
    clustering_modifier_binned_array, clustering_of_a_binned, coherence_length, decoherence_rate,
    lensing_modifier, lensing_modifier_array, redshift_weight, scale_redshift_weight, scale_weight,
};
pub use self::params::{
    BinnedClusteringParams, ClusteringModel, ClusteringParams, CoherenceLengthParams,
    DecoherenceParams, LensingParams,
};

pub mod prelude {
    pub use super::bundle::{ModulationConfig, TransferBundle};
    pub use super::errors::{TransferError, TransferResult};
    pub use super::functions::{
        clustering_modifier, clustering_modifier_binned, coherence_length, decoherence_rate,
        lensing_modifier, scale_redshift_weight,
    };
    pub use super::params::{
        BinnedClusteringParams, ClusteringModel, ClusteringParams, CoherenceLengthParams,
        DecoherenceParams, LensingParams,
    };
}
