//! End-to-end tests: model build from configuration, binary round-trips,
//! and training/inference agreement across a reload.

use std::io::Write as _;

use featex::{Bilou, BilouEntity, EntityMap, FeatureExtractor, NamedEntity, Sentence, Word};

fn resource_file(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    for line in lines {
        writeln!(file, "{line}").expect("write");
    }
    file
}

fn word(form: &str, comments: &str) -> Word {
    let mut word = Word::from_form(form);
    word.lemma_comments = comments.to_string();
    word.tag = "NN".to_string();
    word
}

fn training_sentences() -> Vec<Sentence> {
    let mut first = Sentence::new(vec![
        word("Praha", "_;G"),
        word("je", ""),
        word("hlavní", ""),
        word("město", ""),
        word("14:30", ""),
    ]);
    first.previous_stage[0] = BilouEntity {
        bilou: Some(Bilou::Unit),
        entity: 0,
    };

    let second = Sentence::new(vec![
        word("Info", ""),
        word("na", ""),
        word("info@praha.cz", ""),
        word("nebo", ""),
        word("www.praha.cz", ""),
    ]);
    vec![first, second]
}

fn build_extractor() -> (FeatureExtractor, EntityMap) {
    let brown = resource_file(&["1100\tPraha", "1101\tměsto", "111000\tje"]);
    let gazetteer = resource_file(&["hlavní město", "Praha"]);
    let config = format!(
        "Form 2\n\
         Lemma 2\n\
         RawLemma 2\n\
         Tag 2\n\
         FormCapitalization 2\n\
         RawLemmaCapitalization 2\n\
         NumericTimeValue 2\n\
         PreviousStage 2\n\
         CzechLemmaTerm 2\n\
         BrownClusters 2 {} 2 4\n\
         Gazetteers 2 {}\n\
         URLEmailDetector 1 url email\n\
         CzechAddContainers 0\n",
        brown.path().display(),
        gazetteer.path().display(),
    );

    let mut entities = EntityMap::new();
    let mut extractor = FeatureExtractor::new();
    extractor.parse(&config, &mut entities).expect("configuration parses");

    let mut buffer = String::new();
    for mut sentence in training_sentences() {
        extractor.process_sentence(&mut sentence, true, &mut buffer);
    }
    (extractor, entities)
}

#[test]
fn test_save_load_save_is_byte_identical() {
    let (extractor, _) = build_extractor();

    let mut first = Vec::new();
    extractor.save(&mut first).expect("save");

    let reloaded = FeatureExtractor::load(first.as_slice()).expect("load");
    let mut second = Vec::new();
    reloaded.save(&mut second).expect("save again");

    assert_eq!(first, second);
    assert_eq!(reloaded.total_features(), extractor.total_features());
    assert_eq!(reloaded.processors().len(), 13);
}

#[test]
fn test_reloaded_model_emits_identical_features() {
    let (mut extractor, _) = build_extractor();

    let mut model = Vec::new();
    extractor.save(&mut model).expect("save");
    let mut reloaded = FeatureExtractor::load(model.as_slice()).expect("load");

    let mut buffer = String::new();
    for original_sentence in training_sentences() {
        let mut expected = original_sentence.clone();
        extractor.process_sentence(&mut expected, false, &mut buffer);

        let mut actual = original_sentence;
        reloaded.process_sentence(&mut actual, false, &mut buffer);

        assert_eq!(expected.features, actual.features);
        for (expected_token, actual_token) in
            expected.probabilities.iter().zip(&actual.probabilities)
        {
            assert_eq!(expected_token, actual_token);
        }
    }
}

#[test]
fn test_inference_never_grows_the_feature_space() {
    let (mut extractor, _) = build_extractor();
    let total = extractor.total_features();

    let mut sentence = Sentence::new(vec![word("neznámé", ""), word("slovo", "")]);
    let mut buffer = String::new();
    extractor.process_sentence(&mut sentence, false, &mut buffer);

    assert_eq!(extractor.total_features(), total);
    for features in &sentence.features {
        assert!(features.iter().all(|&f| f < total));
    }
}

#[test]
fn test_url_email_seeding_survives_reload() {
    let (extractor, entities) = build_extractor();

    let mut model = Vec::new();
    extractor.save(&mut model).expect("save");
    let mut reloaded = FeatureExtractor::load(model.as_slice()).expect("load");

    let mut sentence = Sentence::new(vec![word("pište", ""), word("kontakt@mesto.cz", "")]);
    let mut buffer = String::new();
    reloaded.process_sentence(&mut sentence, false, &mut buffer);

    let unit = &sentence.probabilities[1].local[Bilou::Unit as usize];
    assert!(sentence.probabilities[1].local_filled);
    assert_eq!(unit.probability, 1.0);
    assert_eq!(unit.entity, entities.id("email"));
    assert!(!sentence.probabilities[0].local_filled);
}

#[test]
fn test_entity_postprocessing_through_the_extractor() {
    let (extractor, _) = build_extractor();

    let mut sentence = Sentence::new(Vec::new());
    let mut entities = vec![
        NamedEntity::new(0, 1, "pf"),
        NamedEntity::new(1, 1, "ps"),
        NamedEntity::new(3, 1, "tm"),
        NamedEntity::new(4, 1, "ty"),
    ];
    let mut buffer = Vec::new();
    extractor.process_entities(&mut sentence, &mut entities, &mut buffer);

    assert_eq!(entities.len(), 6);
    assert_eq!(entities[0], NamedEntity::new(0, 2, "P"));
    assert_eq!(entities[3], NamedEntity::new(3, 2, "T"));
}

#[test]
fn test_identical_builds_assign_identical_ids() {
    let (extractor_a, _) = build_extractor();
    let (extractor_b, _) = build_extractor();

    assert_eq!(extractor_a.total_features(), extractor_b.total_features());

    let mut model_a = Vec::new();
    extractor_a.save(&mut model_a).expect("save");
    let mut model_b = Vec::new();
    extractor_b.save(&mut model_b).expect("save");
    assert_eq!(model_a, model_b);
}
