use jiff::civil::date;
use uuid::Uuid;

use sonora_core::keys;
use sonora_core::models::anamnesis::{Anamnesis, AnamnesisInput};
use sonora_core::models::audiogram::{Audiogram, AudiogramInput};
use sonora_core::models::codes::{Ear, Pathway};
use sonora_core::models::ldl::{Ldl, LdlInput};
use sonora_core::models::patient::{Patient, PatientInput};
use sonora_core::models::speech::{SpeechAudiometry, SpeechInput};
use sonora_core::models::threshold::{Frequency, Threshold};
use sonora_storage::error::StorageError;
use sonora_storage::objects::ObjectStore;
use sonora_storage::records::Records;

fn records() -> Records {
    Records::new(ObjectStore::in_memory())
}

fn patient(rut: &str, first: &str, last: &str) -> Patient {
    PatientInput {
        rut: rut.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        ..PatientInput::default()
    }
    .into_patient()
}

#[tokio::test]
async fn patient_round_trip() {
    let records = records();
    let mut ana = patient("12.345.678-5", "Ana", "Rojas");
    ana.birth_date = Some(date(1990, 4, 2));
    records.create_patient(&ana).await.unwrap();

    let loaded = records.get_patient(ana.id).await.unwrap();
    assert_eq!(loaded.rut, "12.345.678-5");
    assert_eq!(loaded.birth_date, Some(date(1990, 4, 2)));
}

#[tokio::test]
async fn duplicate_rut_is_rejected_case_insensitively() {
    let records = records();
    records
        .create_patient(&patient("9.876.543-K", "Pedro", "Soto"))
        .await
        .unwrap();

    let err = records
        .create_patient(&patient("9.876.543-k ", "Otro", "Soto"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::DuplicateRut { rut } if rut == "9.876.543-K"));
    assert_eq!(records.list_patients("").await.unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_patient_is_not_stored() {
    let records = records();
    let err = records
        .create_patient(&patient("", "Ana", "Rojas"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Invalid(ref fields) if fields[0].field == "rut"));
    assert!(records.list_patients("").await.unwrap().is_empty());
}

#[tokio::test]
async fn changing_rut_releases_the_old_one() {
    let records = records();
    let mut ana = patient("111-1", "Ana", "Rojas");
    records.create_patient(&ana).await.unwrap();
    let luis = patient("222-2", "Luis", "Soto");
    records.create_patient(&luis).await.unwrap();

    let mut taken = luis.clone();
    taken.rut = "111-1".to_string();
    assert!(matches!(
        records.update_patient(&taken).await.unwrap_err(),
        StorageError::DuplicateRut { .. }
    ));

    ana.rut = "333-3".to_string();
    records.update_patient(&ana).await.unwrap();
    records
        .create_patient(&patient("111-1", "Nuevo", "Paciente"))
        .await
        .unwrap();
}

#[tokio::test]
async fn listing_filters_and_orders_by_name() {
    let records = records();
    for (rut, first, last) in [
        ("1", "Luis", "Soto"),
        ("2", "Zoe", "Alvarez"),
        ("3", "Ana", "Alvarez"),
    ] {
        records.create_patient(&patient(rut, first, last)).await.unwrap();
    }

    let all: Vec<_> = records
        .list_patients("  ")
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.first_name)
        .collect();
    assert_eq!(all, ["Ana", "Zoe", "Luis"]);

    let alvarez = records.list_patients("ALV").await.unwrap();
    assert_eq!(alvarez.len(), 2);

    let recent = records.recent_patients(2).await.unwrap();
    assert_eq!(recent.len(), 2);
}

#[tokio::test]
async fn records_require_an_existing_patient() {
    let records = records();
    let orphan = SpeechInput::default().into_speech(Uuid::new_v4(), date(2024, 1, 1));
    assert!(matches!(
        records.add_record(&orphan).await.unwrap_err(),
        StorageError::NotFound { .. }
    ));
    assert!(matches!(
        records
            .list_records::<SpeechAudiometry>(orphan.patient_id)
            .await
            .unwrap_err(),
        StorageError::NotFound { .. }
    ));
}

#[tokio::test]
async fn audiogram_round_trip_keeps_thresholds() {
    let records = records();
    let ana = patient("12.345.678-5", "Ana", "Rojas");
    records.create_patient(&ana).await.unwrap();

    let audiogram = AudiogramInput {
        date: Some(date(2024, 3, 1)),
        thresholds: vec![
            Threshold::new(Ear::Right, Pathway::Air)
                .with_level(Frequency::Hz500, 20)
                .with_level(Frequency::Hz1000, 25)
                .with_level(Frequency::Hz2000, 30),
        ],
        ..AudiogramInput::default()
    }
    .into_audiogram(ana.id, date(2024, 9, 9))
    .unwrap();
    records.add_record(&audiogram).await.unwrap();

    let loaded: Audiogram = records.get_record(ana.id, audiogram.id).await.unwrap();
    assert_eq!(loaded.thresholds, audiogram.thresholds);
    assert_eq!(loaded.view(&ana).pta_right(), Some(25.0));
}

#[tokio::test]
async fn audiogram_with_duplicate_rows_is_rejected() {
    let records = records();
    let ana = patient("12.345.678-5", "Ana", "Rojas");
    records.create_patient(&ana).await.unwrap();

    let mut audiogram = Audiogram::new(ana.id, date(2024, 3, 1));
    audiogram.thresholds = vec![
        Threshold::new(Ear::Left, Pathway::Air),
        Threshold::new(Ear::Left, Pathway::Air),
    ];
    assert!(matches!(
        records.add_record(&audiogram).await.unwrap_err(),
        StorageError::Invalid(_)
    ));
}

#[tokio::test]
async fn chart_keeps_the_most_recent_records() {
    let records = records();
    let ana = patient("12.345.678-5", "Ana", "Rojas");
    records.create_patient(&ana).await.unwrap();

    for day in 1..=7 {
        let intake = AnamnesisInput::default().into_anamnesis(ana.id, date(2024, 1, day));
        records.add_record(&intake).await.unwrap();
    }
    let ldl = LdlInput::default().into_ldl(ana.id, date(2024, 2, 1));
    records.add_record(&ldl).await.unwrap();

    let chart = records.chart(ana.id, 5).await.unwrap();
    assert_eq!(chart.patient.id, ana.id);
    let days: Vec<_> = chart.anamneses.iter().map(|a| a.date.day()).collect();
    assert_eq!(days, [7, 6, 5, 4, 3]);
    assert_eq!(chart.ldl.len(), 1);
    assert!(chart.audiograms.is_empty());
    assert!(chart.speech.is_empty());

    let all: Vec<Anamnesis> = records.list_records(ana.id).await.unwrap();
    assert_eq!(all.len(), 7);
}

#[tokio::test]
async fn deleting_a_patient_removes_the_whole_chart() {
    let store = ObjectStore::in_memory();
    let records = Records::new(store.clone());
    let ana = patient("12.345.678-5", "Ana", "Rojas");
    let luis = patient("9.876.543-K", "Luis", "Soto");
    records.create_patient(&ana).await.unwrap();
    records.create_patient(&luis).await.unwrap();

    records
        .add_record(&LdlInput::default().into_ldl(ana.id, date(2024, 2, 1)))
        .await
        .unwrap();
    records
        .add_record(&Audiogram::new(ana.id, date(2024, 2, 1)))
        .await
        .unwrap();
    records
        .add_record(&LdlInput::default().into_ldl(luis.id, date(2024, 2, 1)))
        .await
        .unwrap();

    let removed = records.delete_patient(ana.id).await.unwrap();
    assert_eq!(removed, 3);
    assert!(store
        .list(&keys::patient_prefix(ana.id))
        .await
        .unwrap()
        .is_empty());
    assert!(matches!(
        records.get_patient(ana.id).await.unwrap_err(),
        StorageError::NotFound { .. }
    ));

    let remaining: Vec<Ldl> = records.list_records(luis.id).await.unwrap();
    assert_eq!(remaining.len(), 1);

    // The RUT is free again.
    records
        .create_patient(&patient("12.345.678-5", "Ana", "Rojas"))
        .await
        .unwrap();
}

#[tokio::test]
async fn memory_listing_respects_prefix_boundaries() {
    let store = ObjectStore::in_memory();
    for key in ["a/1", "a/2", "ab/1", "b/1"] {
        store.put(key, b"{}".to_vec(), None).await.unwrap();
    }
    assert_eq!(store.list("a/").await.unwrap(), ["a/1", "a/2"]);
    assert_eq!(store.delete_prefix("a").await.unwrap(), 3);
    assert_eq!(store.list("").await.unwrap(), ["b/1"]);
    assert!(store.get_optional("a/1").await.unwrap().is_none());
}
