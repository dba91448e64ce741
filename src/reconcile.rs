//! User-Profile Reconciliation
//!
//! Merges surface horizons observed in the field into the reference profile of
//! a soil component. The user rows are rasterised onto 1 cm slices, gaps are
//! filled from the reference horizon at the same depth, and the slices are
//! collapsed back into 20 cm layers. Layers that intersect user coverage take
//! the re-derived texture, PSCL and coarse fragments; everything else (the
//! chemistry in particular) stays with the reference.

use crate::error::{RatingError, RatingResult};
use crate::layers::{aggregate_layers, derive_texture, WorkingProfile, LAYER_THICKNESS, SLICE_COUNT};
use crate::profile::{Horizon, ReferenceProfile, UserObservation, MAX_RATING_DEPTH};
use crate::utils::texture::{rock_fragment_percent, TextureClass};
use std::cmp::Ordering;

/// A user horizon after parsing, sorting and bedrock truncation
#[derive(Debug, Clone, Copy, PartialEq)]
struct ResolvedHorizon {
    top: f64,
    bottom: f64,
    texture: Option<TextureClass>,
    coarse_fragments: Option<f64>,
}

impl ResolvedHorizon {
    fn covers(&self, depth: f64) -> bool {
        self.top <= depth && depth < self.bottom
    }
}

fn resolve_bedrock(bedrock: Option<f64>) -> RatingResult<f64> {
    match bedrock {
        None => Ok(MAX_RATING_DEPTH),
        Some(depth) if depth.is_nan() || depth <= 0.0 => Err(RatingError::InvalidBedrock(depth)),
        Some(depth) => Ok(depth.min(MAX_RATING_DEPTH)),
    }
}

/// Drop empty rows, parse labels, sort by depth, chain tops and cut at bedrock
fn normalise_horizons(observation: &UserObservation, bedrock: f64) -> RatingResult<Vec<ResolvedHorizon>> {
    let mut parsed: Vec<(f64, Option<TextureClass>, Option<f64>)> = Vec::new();

    for (row, horizon) in observation.horizons.iter().enumerate() {
        if horizon.is_empty() {
            continue;
        }
        let bottom = horizon.bottom.ok_or(RatingError::MissingDepth { row })?;
        if bottom.is_nan() || bottom <= 0.0 {
            return Err(RatingError::NonMonotonicDepth { depth: bottom });
        }
        let texture = horizon
            .texture_name()
            .map(str::parse::<TextureClass>)
            .transpose()?;
        let coarse_fragments = horizon
            .rock_fragment_label()
            .map(rock_fragment_percent)
            .transpose()?;
        parsed.push((bottom, texture, coarse_fragments));
    }

    parsed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    if let Some(pair) = parsed.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(RatingError::NonMonotonicDepth { depth: pair[1].0 });
    }

    let mut top = 0.0;
    let mut resolved = Vec::with_capacity(parsed.len());
    for (bottom, texture, coarse_fragments) in parsed {
        if top >= bedrock {
            break;
        }
        resolved.push(ResolvedHorizon {
            top,
            bottom: bottom.min(bedrock),
            texture,
            coarse_fragments,
        });
        top = bottom;
    }
    Ok(resolved)
}

/// Measured sand and clay of a reference horizon, or its texture class means
fn reference_sand_clay(horizon: &Horizon) -> (Option<f64>, Option<f64>) {
    match (horizon.sand, horizon.clay, horizon.texture) {
        (Some(sand), Some(clay), _) => (Some(sand), Some(clay)),
        (_, _, Some(texture)) => {
            let (sand, clay) = texture.mean_sand_clay();
            (Some(sand), Some(clay))
        }
        (sand, clay, None) => (sand, clay),
    }
}

/// Build the working profile a rating run evaluates.
///
/// Without user data (or with an observation that carries nothing) the
/// reference horizons down to 120 cm pass through and `ref_depth` is capped at
/// 120. Otherwise `ref_depth` becomes the bedrock depth, or 120 when absent.
pub fn reconcile(
    reference: &ReferenceProfile,
    observation: Option<&UserObservation>,
) -> RatingResult<WorkingProfile> {
    reference.validate()?;

    let observation = match observation.filter(|o| !o.is_empty()) {
        Some(observation) => observation,
        None => {
            let mut profile = WorkingProfile::from_reference(reference, MAX_RATING_DEPTH);
            profile.site.ref_depth = reference.site.ref_depth.min(MAX_RATING_DEPTH);
            return Ok(profile);
        }
    };

    let bedrock = resolve_bedrock(observation.bedrock)?;
    let user_rows = normalise_horizons(observation, bedrock)?;
    let depth = (bedrock.ceil() as usize).min(SLICE_COUNT);

    let mut sand = vec![None; SLICE_COUNT];
    let mut clay = vec![None; SLICE_COUNT];
    let mut coarse = vec![None; SLICE_COUNT];
    let mut covered = vec![false; SLICE_COUNT];

    for slice in 0..depth {
        let at = slice as f64;
        let user = user_rows.iter().find(|row| row.covers(at));
        let fallback = reference.horizon_at(at);
        covered[slice] = user.is_some();

        let user_means = user.and_then(|row| row.texture).map(|t| t.mean_sand_clay());
        let (user_sand, user_clay) = match user_means {
            Some((s, c)) => (Some(s), Some(c)),
            None => (None, None),
        };
        let (reference_sand, reference_clay) = fallback.map_or((None, None), reference_sand_clay);
        sand[slice] = user_sand.or(reference_sand);
        clay[slice] = user_clay.or(reference_clay);
        coarse[slice] = user
            .and_then(|row| row.coarse_fragments)
            .or_else(|| fallback.and_then(|h| h.coarse_fragments));
    }

    let sand_layers = aggregate_layers(&sand, depth);
    let clay_layers = aggregate_layers(&clay, depth);
    let coarse_layers = aggregate_layers(&coarse, depth);

    let mut profile = WorkingProfile::from_reference(reference, bedrock);
    let layer_count = profile.layer_count().min(sand_layers.len());
    profile.layers.truncate(layer_count);

    for (index, layer) in profile.layers.iter_mut().enumerate() {
        layer.bottom = layer.bottom.min(bedrock);

        let first = index * LAYER_THICKNESS;
        let last = sand_layers[index].bottom;
        if !covered[first..last].iter().any(|&c| c) {
            continue;
        }

        if let Some(texture) = derive_texture(sand_layers[index].mean, clay_layers[index].mean) {
            layer.texture = Some(texture);
            layer.pscl = Some(texture.pscl());
        }
        if let Some(cf) = coarse_layers[index].mean {
            layer.coarse_fragments = Some(cf);
        }
    }

    profile.site.ref_depth = bedrock;
    Ok(profile)
}
