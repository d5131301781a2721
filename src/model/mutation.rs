use chrono::NaiveDate;

/// The four labeled edit categories the change-segment algorithm can
/// produce, plus the two degenerate cases (spec.md §4.4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    ReduccionIzquierda,
    ReduccionDerecha,
    AgregadoIzquierda,
    AgregadoDerecha,
    SinCambios,
    SinCoincidencia,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::ReduccionIzquierda => "reduccion_izquierda",
            ChangeKind::ReduccionDerecha => "reduccion_derecha",
            ChangeKind::AgregadoIzquierda => "agregado_izquierda",
            ChangeKind::AgregadoDerecha => "agregado_derecha",
            ChangeKind::SinCambios => "sin_cambios",
            ChangeKind::SinCoincidencia => "sin_coincidencia",
        }
    }
}

/// One row of the per-diagnostic mutation-history CSV: a single change
/// segment against one prior sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRow {
    pub previous_sample_date: NaiveDate,
    pub start_index: i64,
    pub end_index: i64,
    pub change_kind: ChangeKind,
}

/// Compute the change-segment rows between `current` and `previous` per the
/// spec.md §4.4.3 algorithm. Indexing is inclusive start/end.
///
/// This only detects prefix/suffix edits (pure containment one way or the
/// other) — it does not attempt to generalize to interior substitutions or
/// indels (spec.md §9 open question).
pub fn change_segments(current: &str, previous: &str) -> Vec<(i64, i64, ChangeKind)> {
    if current.is_empty() || previous.is_empty() {
        return vec![(-1, -1, ChangeKind::SinCoincidencia)];
    }

    if let Some(s) = previous.find(current) {
        let s = s as i64;
        let current_len = current.len() as i64;
        let previous_len = previous.len() as i64;

        let left = (s > 0).then_some((0, s - 1, ChangeKind::ReduccionIzquierda));
        let right_start = s + current_len;
        let right = (right_start <= previous_len - 1)
            .then_some((right_start, previous_len - 1, ChangeKind::ReduccionDerecha));

        return match (left, right) {
            (None, None) => vec![(-1, -1, ChangeKind::SinCambios)],
            (Some(l), None) => vec![l],
            (None, Some(r)) => vec![r],
            (Some(l), Some(r)) => vec![l, r],
        };
    }

    if let Some(s) = current.find(previous) {
        let s = s as i64;
        let previous_len = previous.len() as i64;
        let current_len = current.len() as i64;

        let left = (s > 0).then_some((0, s - 1, ChangeKind::AgregadoIzquierda));
        let right_start = s + previous_len;
        let right = (right_start <= current_len - 1)
            .then_some((right_start, current_len - 1, ChangeKind::AgregadoDerecha));

        return match (left, right) {
            (None, None) => vec![(-1, -1, ChangeKind::SinCambios)],
            (Some(l), None) => vec![l],
            (None, Some(r)) => vec![r],
            (Some(l), Some(r)) => vec![l, r],
        };
    }

    vec![(-1, -1, ChangeKind::SinCoincidencia)]
}
