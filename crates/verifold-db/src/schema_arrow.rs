//! Arrow schema and conversion utilities for the ledger table.
//!
//! Provides the RecordBatch conversion functions needed to work with
//! LanceDB's API. Column order here must match `discovery_schema()`.

use crate::error::{DbError, Result};
use crate::schema::Discovery;
use arrow_array::{Array, BooleanArray, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;
use verifold_common::virtue::{GeneticsVirtues, VirtueScores};

pub fn discovery_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("sequence", DataType::Utf8, false),
        Field::new("sequence_hash", DataType::Int64, false),
        Field::new("length", DataType::Int64, false),
        Field::new("energy_kcal_mol", DataType::Float64, false),
        Field::new("validation_score", DataType::Float64, false),
        Field::new("coherence", DataType::Float64, false),
        Field::new("state_fidelity", DataType::Float64, false),
        Field::new("vqbit_score", DataType::Float64, false),
        Field::new("virtue_justice", DataType::Float64, false),
        Field::new("virtue_honesty", DataType::Float64, false),
        Field::new("virtue_temperance", DataType::Float64, false),
        Field::new("virtue_prudence", DataType::Float64, false),
        Field::new("genetics_fidelity", DataType::Float64, false),
        Field::new("genetics_robustness", DataType::Float64, false),
        Field::new("genetics_efficiency", DataType::Float64, false),
        Field::new("genetics_resilience", DataType::Float64, false),
        Field::new("genetics_parsimony", DataType::Float64, false),
        Field::new("druglikeness_score", DataType::Float64, false),
        Field::new("druggable", DataType::Boolean, false),
        Field::new("priority", DataType::Utf8, false),
        Field::new("charged_residues", DataType::Int64, false),
        Field::new("hydrophobic_fraction", DataType::Float64, false),
        Field::new("genetics_context", DataType::Utf8, true),
        Field::new("assessment", DataType::Utf8, false),
        Field::new("discovered_at", DataType::Utf8, false),
    ]))
}

/// Convert a slice of discoveries into a single RecordBatch.
pub fn discoveries_to_record(records: &[Discovery]) -> Result<RecordBatch> {
    let schema = discovery_schema();

    let id: StringArray = records.iter().map(|d| Some(d.id.to_string())).collect();
    let sequence: StringArray = records.iter().map(|d| Some(d.sequence.as_str())).collect();
    let sequence_hash = Int64Array::from_iter_values(records.iter().map(|d| d.sequence_hash));
    let length = Int64Array::from_iter_values(records.iter().map(|d| d.length));
    let energy = Float64Array::from_iter_values(records.iter().map(|d| d.energy_kcal_mol));
    let validation = Float64Array::from_iter_values(records.iter().map(|d| d.validation_score));
    let coherence = Float64Array::from_iter_values(records.iter().map(|d| d.coherence));
    let fidelity = Float64Array::from_iter_values(records.iter().map(|d| d.state_fidelity));
    let vqbit = Float64Array::from_iter_values(records.iter().map(|d| d.vqbit_score));
    let v_justice = Float64Array::from_iter_values(records.iter().map(|d| d.virtues.justice));
    let v_honesty = Float64Array::from_iter_values(records.iter().map(|d| d.virtues.honesty));
    let v_temperance =
        Float64Array::from_iter_values(records.iter().map(|d| d.virtues.temperance));
    let v_prudence = Float64Array::from_iter_values(records.iter().map(|d| d.virtues.prudence));
    let g_fidelity =
        Float64Array::from_iter_values(records.iter().map(|d| d.genetics_virtues.fidelity));
    let g_robustness =
        Float64Array::from_iter_values(records.iter().map(|d| d.genetics_virtues.robustness));
    let g_efficiency =
        Float64Array::from_iter_values(records.iter().map(|d| d.genetics_virtues.efficiency));
    let g_resilience =
        Float64Array::from_iter_values(records.iter().map(|d| d.genetics_virtues.resilience));
    let g_parsimony =
        Float64Array::from_iter_values(records.iter().map(|d| d.genetics_virtues.parsimony));
    let druglikeness =
        Float64Array::from_iter_values(records.iter().map(|d| d.druglikeness_score));
    let druggable: BooleanArray = records.iter().map(|d| Some(d.druggable)).collect();
    let priority: StringArray = records.iter().map(|d| Some(d.priority.as_str())).collect();
    let charged = Int64Array::from_iter_values(records.iter().map(|d| d.charged_residues));
    let hydrophobic =
        Float64Array::from_iter_values(records.iter().map(|d| d.hydrophobic_fraction));
    let genetics_context: StringArray = records
        .iter()
        .map(|d| d.genetics_context.as_deref())
        .collect();
    let assessment: StringArray = records.iter().map(|d| Some(d.assessment.as_str())).collect();
    let discovered_at: StringArray = records
        .iter()
        .map(|d| Some(d.discovered_at.to_rfc3339()))
        .collect();

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(id) as Arc<dyn Array>,
            Arc::new(sequence),
            Arc::new(sequence_hash),
            Arc::new(length),
            Arc::new(energy),
            Arc::new(validation),
            Arc::new(coherence),
            Arc::new(fidelity),
            Arc::new(vqbit),
            Arc::new(v_justice),
            Arc::new(v_honesty),
            Arc::new(v_temperance),
            Arc::new(v_prudence),
            Arc::new(g_fidelity),
            Arc::new(g_robustness),
            Arc::new(g_efficiency),
            Arc::new(g_resilience),
            Arc::new(g_parsimony),
            Arc::new(druglikeness),
            Arc::new(druggable),
            Arc::new(priority),
            Arc::new(charged),
            Arc::new(hydrophobic),
            Arc::new(genetics_context),
            Arc::new(assessment),
            Arc::new(discovered_at),
        ],
    )
    .map_err(|e| DbError::Arrow(e.to_string()))
}

/// Extract one discovery from a RecordBatch row.
pub fn record_to_discovery(batch: &RecordBatch, row: usize) -> Result<Discovery> {
    let get_string = |col: usize| -> Result<String> {
        let arr = batch
            .column(col)
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| DbError::Arrow(format!("column {col} is not Utf8")))?;
        Ok(arr.value(row).to_string())
    };

    let get_opt_string = |col: usize| -> Result<Option<String>> {
        let arr = batch
            .column(col)
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| DbError::Arrow(format!("column {col} is not Utf8")))?;
        Ok(if arr.is_null(row) {
            None
        } else {
            Some(arr.value(row).to_string())
        })
    };

    let get_i64 = |col: usize| -> Result<i64> {
        let arr = batch
            .column(col)
            .as_any()
            .downcast_ref::<Int64Array>()
            .ok_or_else(|| DbError::Arrow(format!("column {col} is not Int64")))?;
        Ok(arr.value(row))
    };

    let get_f64 = |col: usize| -> Result<f64> {
        let arr = batch
            .column(col)
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| DbError::Arrow(format!("column {col} is not Float64")))?;
        Ok(arr.value(row))
    };

    let get_bool = |col: usize| -> Result<bool> {
        let arr = batch
            .column(col)
            .as_any()
            .downcast_ref::<BooleanArray>()
            .ok_or_else(|| DbError::Arrow(format!("column {col} is not Boolean")))?;
        Ok(arr.value(row))
    };

    Ok(Discovery {
        id: uuid::Uuid::parse_str(&get_string(0)?)
            .map_err(|e| DbError::InvalidQuery(e.to_string()))?,
        sequence: get_string(1)?,
        sequence_hash: get_i64(2)?,
        length: get_i64(3)?,
        energy_kcal_mol: get_f64(4)?,
        validation_score: get_f64(5)?,
        coherence: get_f64(6)?,
        state_fidelity: get_f64(7)?,
        vqbit_score: get_f64(8)?,
        virtues: VirtueScores {
            justice: get_f64(9)?,
            honesty: get_f64(10)?,
            temperance: get_f64(11)?,
            prudence: get_f64(12)?,
        },
        genetics_virtues: GeneticsVirtues {
            fidelity: get_f64(13)?,
            robustness: get_f64(14)?,
            efficiency: get_f64(15)?,
            resilience: get_f64(16)?,
            parsimony: get_f64(17)?,
        },
        druglikeness_score: get_f64(18)?,
        druggable: get_bool(19)?,
        priority: get_string(20)?,
        charged_residues: get_i64(21)?,
        hydrophobic_fraction: get_f64(22)?,
        genetics_context: get_opt_string(23)?,
        assessment: get_string(24)?,
        discovered_at: chrono::DateTime::parse_from_rfc3339(&get_string(25)?)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .unwrap_or_else(|_| chrono::Utc::now()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_record_conversion() {
        let mut d = Discovery::new("MKVLAWDEFGSTNQRHYCIL".to_string(), 0.8);
        d.energy_kcal_mol = -312.5;
        d.genetics_context = Some(r#"{"genetic_variants":[]}"#.to_string());
        d.priority = "HIGH".to_string();
        d.druggable = true;

        let batch = discoveries_to_record(std::slice::from_ref(&d)).unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.num_columns(), discovery_schema().fields().len());

        let back = record_to_discovery(&batch, 0).unwrap();
        assert_eq!(back.id, d.id);
        assert_eq!(back.sequence, d.sequence);
        assert_eq!(back.priority, "HIGH");
        assert!(back.druggable);
        assert_eq!(back.genetics_context, d.genetics_context);
    }

    #[test]
    fn test_null_genetics_context_preserved() {
        let d = Discovery::new("MKVLAWDEFGSTNQRHYCIL".to_string(), 0.8);
        let batch = discoveries_to_record(std::slice::from_ref(&d)).unwrap();
        let back = record_to_discovery(&batch, 0).unwrap();
        assert!(back.genetics_context.is_none());
    }
}
