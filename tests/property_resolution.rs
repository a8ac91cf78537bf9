use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use wirecore::{asset, Container, CoreError, FactoryOptions};

fn identifiers(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z][a-z0-9_]{0,11}", 1..max)
        .prop_map(|set| set.into_iter().filter(|id| id != "injector").collect())
        .prop_filter("need at least one identifier", |ids: &Vec<String>| {
            !ids.is_empty()
        })
}

proptest! {
    #[test]
    fn every_registered_constant_resolves_to_its_own_value(ids in identifiers(24)) {
        let core = Container::new();
        for (index, id) in ids.iter().enumerate() {
            core.constant(id, index).unwrap();
        }

        for (index, id) in ids.iter().enumerate() {
            prop_assert!(core.has(id));
            prop_assert_eq!(*core.get_as::<usize>(id).unwrap(), index);
        }
    }

    #[test]
    fn linear_chains_resolve_and_unwind(ids in identifiers(16)) {
        let core = Container::new();
        let last = ids.len() - 1;
        for (index, id) in ids.iter().enumerate() {
            if index == last {
                core.constant(id, 1usize).unwrap();
            } else {
                let next = ids[index + 1].clone();
                core.factory(id, FactoryOptions::new().inject([next]), |args| {
                    Ok(asset(*args.get::<usize>(0)? + 1))
                })
                .unwrap();
            }
        }
        core.bootstrap().unwrap();

        prop_assert_eq!(*core.get_as::<usize>(&ids[0]).unwrap(), ids.len());
        // Tracking state fully unwound: resolving again behaves identically.
        prop_assert_eq!(*core.get_as::<usize>(&ids[0]).unwrap(), ids.len());
    }

    #[test]
    fn rings_report_the_full_path(ids in identifiers(12)) {
        let core = Container::new();
        for (index, id) in ids.iter().enumerate() {
            let next = ids[(index + 1) % ids.len()].clone();
            core.factory(id, FactoryOptions::new().inject([next]), |_| {
                Ok(asset(()))
            })
            .unwrap();
        }
        core.bootstrap().unwrap();

        match core.get(&ids[0]) {
            Err(CoreError::Cycle(path)) => {
                prop_assert_eq!(path.len(), ids.len() + 1);
                prop_assert_eq!(&path[0], &ids[0]);
                prop_assert_eq!(path.last(), Some(&ids[0]));
            }
            other => prop_assert!(false, "expected cycle, got {:?}", other.map(|_| ())),
        }

        // A failed ring leaves later resolutions untouched.
        core.constant("sentinel_after_ring", 1u8).unwrap();
        prop_assert_eq!(*core.get_as::<u8>("sentinel_after_ring").unwrap(), 1);
    }

    #[test]
    fn cached_factories_materialize_once(ids in identifiers(12), lookups in 1usize..8) {
        let core = Container::new();
        let counters: Vec<Rc<Cell<u32>>> =
            ids.iter().map(|_| Rc::new(Cell::new(0))).collect();

        for (index, id) in ids.iter().enumerate() {
            let counter = counters[index].clone();
            core.factory(id, FactoryOptions::new().cache(true), move |_| {
                counter.set(counter.get() + 1);
                Ok(asset(index))
            })
            .unwrap();
        }
        core.bootstrap().unwrap();

        for _ in 0..lookups {
            for (index, id) in ids.iter().enumerate() {
                prop_assert_eq!(*core.get_as::<usize>(id).unwrap(), index);
            }
        }
        for counter in &counters {
            prop_assert_eq!(counter.get(), 1);
        }
    }
}
