//! Post-prediction synthesis of Czech container entities.

use super::ProcessorBase;
use crate::error::{Error, Result};
use crate::sentence::{NamedEntity, Sentence};

/// Builds `P` (person) and `T` (time) container entities over runs of
/// abutting predicted sub-entities.
///
/// Input entities are expected sorted and non-overlapping by start token. A
/// container is pushed immediately before the entity that triggered it, so
/// the merged list is not position-sorted; every original entity is kept and
/// containers overlap their constituents. The downstream consumer handles
/// both properties.
#[derive(Debug, Clone, Default)]
pub struct CzechAddContainers {
    pub(super) base: ProcessorBase,
}

/// Whether `second` starts on the token right after `first` ends.
fn abuts(first: &NamedEntity, second: &NamedEntity) -> bool {
    first.end() == second.start
}

impl CzechAddContainers {
    pub(super) fn parse(&mut self, window: u32) -> Result<()> {
        if window != 0 {
            return Err(Error::WindowConstraint(
                "CzechAddContainers cannot have a non-zero window".to_string(),
            ));
        }
        self.base.parse(window);
        Ok(())
    }

    pub(super) fn process_entities(
        &self,
        _sentence: &mut Sentence,
        entities: &mut Vec<NamedEntity>,
        buffer: &mut Vec<NamedEntity>,
    ) {
        buffer.clear();

        for i in 0..entities.len() {
            // P over a maximal pf+ ps+ run, triggered at its first pf.
            if entities[i].entity_type == "pf"
                && (i == 0
                    || entities[i - 1].end() < entities[i].start
                    || entities[i - 1].entity_type != "pf")
            {
                let mut j = i + 1;
                while j < entities.len()
                    && abuts(&entities[j - 1], &entities[j])
                    && entities[j].entity_type == "pf"
                {
                    j += 1;
                }
                if j < entities.len()
                    && abuts(&entities[j - 1], &entities[j])
                    && entities[j].entity_type == "ps"
                {
                    j += 1;
                    while j < entities.len()
                        && abuts(&entities[j - 1], &entities[j])
                        && entities[j].entity_type == "ps"
                    {
                        j += 1;
                    }
                    buffer.push(NamedEntity::new(
                        entities[i].start,
                        entities[j - 1].end() - entities[i].start,
                        "P",
                    ));
                }
            }

            // T over td tm, optionally extended by ty.
            if entities[i].entity_type == "td"
                && i + 1 < entities.len()
                && abuts(&entities[i], &entities[i + 1])
                && entities[i + 1].entity_type == "tm"
            {
                let mut j = i + 2;
                if j < entities.len()
                    && abuts(&entities[j - 1], &entities[j])
                    && entities[j].entity_type == "ty"
                {
                    j += 1;
                }
                buffer.push(NamedEntity::new(
                    entities[i].start,
                    entities[j - 1].end() - entities[i].start,
                    "T",
                ));
            }

            // T over tm ty when the tm is not preceded by an abutting td.
            if entities[i].entity_type == "tm"
                && (i == 0
                    || entities[i - 1].end() < entities[i].start
                    || entities[i - 1].entity_type != "td")
                && i + 1 < entities.len()
                && abuts(&entities[i], &entities[i + 1])
                && entities[i + 1].entity_type == "ty"
            {
                buffer.push(NamedEntity::new(
                    entities[i].start,
                    entities[i + 1].end() - entities[i].start,
                    "T",
                ));
            }

            buffer.push(entities[i].clone());
        }

        if buffer.len() > entities.len() {
            std::mem::swap(entities, buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> CzechAddContainers {
        let mut processor = CzechAddContainers::default();
        processor.parse(0).unwrap();
        processor
    }

    fn run(entities: &[(usize, usize, &str)]) -> Vec<(usize, usize, String)> {
        let mut entities: Vec<NamedEntity> = entities
            .iter()
            .map(|&(start, length, entity_type)| NamedEntity::new(start, length, entity_type))
            .collect();
        let mut buffer = Vec::new();
        let mut sentence = Sentence::new(Vec::new());
        processor().process_entities(&mut sentence, &mut entities, &mut buffer);
        entities
            .into_iter()
            .map(|entity| (entity.start, entity.length, entity.entity_type))
            .collect()
    }

    #[test]
    fn test_person_and_time_containers() {
        let result = run(&[
            (0, 1, "pf"),
            (1, 1, "pf"),
            (2, 1, "ps"),
            (5, 1, "td"),
            (6, 1, "tm"),
            (7, 1, "ty"),
        ]);
        assert_eq!(
            result,
            vec![
                (0, 3, "P".to_string()),
                (0, 1, "pf".to_string()),
                (1, 1, "pf".to_string()),
                (2, 1, "ps".to_string()),
                (5, 3, "T".to_string()),
                (5, 1, "td".to_string()),
                (6, 1, "tm".to_string()),
                (7, 1, "ty".to_string()),
            ]
        );
    }

    #[test]
    fn test_person_requires_a_surname() {
        // pf pf without ps yields no container.
        let result = run(&[(0, 1, "pf"), (1, 1, "pf")]);
        assert_eq!(
            result,
            vec![(0, 1, "pf".to_string()), (1, 1, "pf".to_string())]
        );
    }

    #[test]
    fn test_person_run_must_abut() {
        // A gap between given name and surname breaks the container.
        let result = run(&[(0, 1, "pf"), (2, 1, "ps")]);
        assert_eq!(
            result,
            vec![(0, 1, "pf".to_string()), (2, 1, "ps".to_string())]
        );
    }

    #[test]
    fn test_multiword_person_names() {
        let result = run(&[(3, 2, "pf"), (5, 1, "ps"), (6, 2, "ps")]);
        assert_eq!(result[0], (3, 5, "P".to_string()));
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_month_year_without_day() {
        let result = run(&[(4, 1, "tm"), (5, 1, "ty")]);
        assert_eq!(
            result,
            vec![
                (4, 2, "T".to_string()),
                (4, 1, "tm".to_string()),
                (5, 1, "ty".to_string()),
            ]
        );
    }

    #[test]
    fn test_day_month_without_year() {
        let result = run(&[(0, 1, "td"), (1, 1, "tm")]);
        assert_eq!(result[0], (0, 2, "T".to_string()));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_tm_after_td_does_not_fire_twice() {
        // td tm ty creates exactly one T, at the td trigger.
        let result = run(&[(0, 1, "td"), (1, 1, "tm"), (2, 1, "ty")]);
        let containers: Vec<_> = result.iter().filter(|e| e.2 == "T").collect();
        assert_eq!(containers.len(), 1);
        assert_eq!(*containers[0], (0, 3, "T".to_string()));
    }

    #[test]
    fn test_no_containers_leaves_input_untouched() {
        let result = run(&[(0, 1, "gc"), (2, 1, "ps")]);
        assert_eq!(
            result,
            vec![(0, 1, "gc".to_string()), (2, 1, "ps".to_string())]
        );
    }

    #[test]
    fn test_nonzero_window_is_rejected() {
        let mut processor = CzechAddContainers::default();
        assert!(matches!(
            processor.parse(2),
            Err(Error::WindowConstraint(_))
        ));
    }
}
