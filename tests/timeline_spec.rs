use chrono::{NaiveDate, NaiveTime};
use reel_timeline::fields::{PhaseStatus, ProjectType};
use reel_timeline::*;
use speculate2::speculate;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn milestone(id: &str, date: NaiveDate, completed: bool, deps: &[&str]) -> Milestone {
    let mut m = Milestone::new(id, format!("Milestone {}", id), date);
    m.completed = completed;
    m.dependencies = deps.iter().map(|d| d.to_string()).collect();
    m
}

fn phase(id: &str, start: NaiveDate, end: NaiveDate, milestones: Vec<Milestone>) -> TimelinePhase {
    let mut p = TimelinePhase::new(id, id, PhaseStatus::Upcoming, start, end, ProjectType::FeatureFilm);
    p.milestones = milestones;
    p
}

fn ids(chain: &[&Milestone]) -> Vec<String> {
    chain.iter().map(|m| m.id.clone()).collect()
}

speculate! {
    before {
        let july = phase(
            "shoot",
            day(2024, 7, 1),
            day(2024, 7, 31),
            vec![
                milestone("A", day(2024, 7, 1), true, &["B"]),
                milestone("B", day(2024, 7, 2), true, &["A"]),
                milestone("C", day(2024, 7, 1), false, &["Z"]),
            ],
        );
        let phases = vec![july];
    }

    describe "calculate_phase_progress" {
        it "returns 67 for two of three milestones" {
            assert_eq!(calculate_phase_progress(&phases[0]), 67);
        }

        it "returns 0 for a phase without milestones" {
            let empty = phase("empty", day(2024, 1, 1), day(2024, 1, 2), vec![]);
            assert_eq!(calculate_phase_progress(&empty), 0);
        }

        it "stays within 0..=100" {
            for n in 0..12usize {
                let ms = (0..n).map(|i| milestone(&i.to_string(), day(2024, 7, 1), i % 3 == 0, &[])).collect();
                let p = phase("p", day(2024, 7, 1), day(2024, 7, 1), ms);
                assert!(calculate_phase_progress(&p) <= 100);
            }
        }
    }

    describe "calculate_milestone_progress" {
        it "lets completed subtasks override the milestone flag" {
            let mut m = milestone("M", day(2024, 7, 3), false, &[]);
            m.sub_tasks = vec![
                SubTask { completed: true, ..SubTask::new("s1", "Slate") },
                SubTask { completed: true, ..SubTask::new("s2", "Sound") },
            ];
            assert_eq!(calculate_milestone_progress(&m), 100);
            assert_eq!(m.completion_state(), CompletionState::Derived { completed: 2, total: 2 });
        }
    }

    describe "get_milestones_for_date" {
        it "compares by calendar day, not instant" {
            let late = day(2024, 7, 1).and_time(NaiveTime::from_hms_opt(23, 59, 0).expect("time"));
            let found = get_milestones_for_date(&phases, &late);
            assert_eq!(ids(&found), vec!["A", "C"]);
        }

        it "returns nothing for an empty day" {
            assert!(get_milestones_for_date(&phases, &day(2024, 7, 20)).is_empty());
        }
    }

    describe "get_phase_for_date" {
        it "signals absence outside every phase" {
            assert!(get_phase_for_date(&phases, &day(2024, 8, 1)).is_none());
            assert_eq!(get_phase_for_date(&phases, &day(2024, 7, 31)).map(|p| p.id.as_str()), Some("shoot"));
        }
    }

    describe "get_dependency_chain" {
        it "terminates on a cycle with each milestone once" {
            assert_eq!(ids(&get_dependency_chain("A", &phases)), vec!["A", "B"]);
        }

        it "skips dangling dependency ids" {
            assert_eq!(ids(&get_dependency_chain("C", &phases)), vec!["C"]);
        }

        it "returns an empty chain for an unknown id" {
            assert!(get_dependency_chain("Q", &phases).is_empty());
        }
    }

    describe "sort_milestones" {
        it "keeps equal dates in input order" {
            let sorted = sort_milestones(&phases[0].milestones);
            let order: Vec<&str> = sorted.iter().map(|m| m.id.as_str()).collect();
            assert_eq!(order, vec!["A", "C", "B"]);
            assert_eq!(phases[0].milestones[1].id, "B");
        }
    }

    describe "validate_milestone_dates" {
        it "accepts both boundaries" {
            assert!(validate_milestone_dates(&milestone("s", day(2024, 7, 1), false, &[]), &phases[0]));
            assert!(validate_milestone_dates(&milestone("e", day(2024, 7, 31), false, &[]), &phases[0]));
        }

        it "rejects one day outside either bound" {
            assert!(!validate_milestone_dates(&milestone("b", day(2024, 6, 30), false, &[]), &phases[0]));
            assert!(!validate_milestone_dates(&milestone("a", day(2024, 8, 1), false, &[]), &phases[0]));
        }
    }

    describe "idempotence" {
        it "gives identical results on repeated calls" {
            let snapshot = phases.clone();
            let d = day(2024, 7, 1);
            assert_eq!(calculate_phase_progress(&phases[0]), calculate_phase_progress(&phases[0]));
            assert_eq!(get_milestones_for_date(&phases, &d), get_milestones_for_date(&phases, &d));
            assert_eq!(get_dependency_chain("A", &phases), get_dependency_chain("A", &phases));
            assert_eq!(sort_milestones(&phases[0].milestones), sort_milestones(&phases[0].milestones));
            assert_eq!(phases, snapshot);
        }
    }
}
