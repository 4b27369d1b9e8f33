//! Minimizable trait and its implementation for [`Cover`]
//!
//! The trait gives every supported representation the same four entry
//! points: heuristic and exact minimization, each with or without a custom
//! configuration. All methods take `&self` and return a new minimized
//! instance.

use super::Cover;
use crate::error::MinimizationError;
use crate::espresso::{Espresso, EspressoConfig, SolveStatus};

/// Public trait for types that can be minimized
///
/// ```
/// use espresso_native::{Cover, CoverType, Minimizable};
///
/// let mut cover = Cover::new(CoverType::F);
/// cover.add_cube(&[Some(false), None], &[Some(true)]);
/// cover.add_cube(&[Some(true), None], &[Some(true)]);
/// let minimized = cover.minimize().unwrap();
/// assert_eq!(minimized.num_cubes(), 1);
/// ```
pub trait Minimizable {
    /// Minimize using the heuristic algorithm with the default
    /// configuration.
    fn minimize(&self) -> Result<Self, MinimizationError>
    where
        Self: Sized,
    {
        self.minimize_with_config(&EspressoConfig::default())
    }

    /// Minimize using the heuristic algorithm with a custom configuration.
    fn minimize_with_config(&self, config: &EspressoConfig) -> Result<Self, MinimizationError>
    where
        Self: Sized;

    /// Minimize exactly (guaranteed minimum cube count, slower) with the
    /// default configuration.
    fn minimize_exact(&self) -> Result<Self, MinimizationError>
    where
        Self: Sized,
    {
        self.minimize_exact_with_config(&EspressoConfig::default())
    }

    /// Minimize exactly with a custom configuration.
    fn minimize_exact_with_config(
        &self,
        config: &EspressoConfig,
    ) -> Result<Self, MinimizationError>
    where
        Self: Sized;
}

/// Shared lowering: split the typed cubes into engine covers, run the given
/// engine entry point, lift the resulting ON-set back.
fn minimize_cover_with<F>(
    cover: &Cover,
    config: &EspressoConfig,
    minimize_fn: F,
) -> Result<Cover, MinimizationError>
where
    F: FnOnce(
        &Espresso,
        &crate::espresso::EspressoCover,
        Option<&crate::espresso::EspressoCover>,
        Option<&crate::espresso::EspressoCover>,
    ) -> Result<crate::espresso::Minimized, crate::espresso::EspressoError>,
{
    if cover.num_outputs() == 0 {
        // Nothing to minimize before the first cube fixes the dimensions.
        return Ok(cover.clone());
    }
    let (f, d, r) = cover.to_engine_covers()?;
    let esp = Espresso::new(cover.num_inputs(), cover.num_outputs(), config)?;
    let d_opt = (d.num_cubes() > 0).then_some(&d);
    let r_opt = (r.num_cubes() > 0).then_some(&r);
    let minimized = minimize_fn(&esp, &f, d_opt, r_opt)?;
    if minimized.status == SolveStatus::SoftTimeout {
        log::warn!("minimization hit the configured deadline; result is valid but unpolished");
    }
    Ok(cover.replace_f_cubes(&minimized.cover, cover.cover_type()))
}

impl Minimizable for Cover {
    fn minimize_with_config(&self, config: &EspressoConfig) -> Result<Self, MinimizationError> {
        minimize_cover_with(self, config, |esp, f, d, r| esp.minimize(f, d, r))
    }

    fn minimize_exact_with_config(
        &self,
        config: &EspressoConfig,
    ) -> Result<Self, MinimizationError> {
        minimize_cover_with(self, config, |esp, f, d, r| esp.minimize_exact(f, d, r))
    }
}
