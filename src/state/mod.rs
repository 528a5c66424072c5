//! Widget parameter state: declared ranges, clamp-and-snap storage, and
//! the per-widget state holders.

pub mod params;
pub mod widgets;

pub use params::{ParamSpec, ParameterSet};
pub use widgets::{
    DiseaseLab, EvidenceMode, FilterLab, FireAlarmLab, GradientLab, GradientReport, LabWidget,
    NeighborLab, PosteriorReport, SlicingLab,
};
