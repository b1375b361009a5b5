use super::*;
use crate::foundation::math::Vec3;

#[test]
fn test_add_appends_after_transform() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    let a = fixture.recorder("a").into_ref();
    let b = fixture.recorder("b").into_ref();

    object.add_component(Rc::clone(&a));
    object.add_component(Rc::clone(&b));

    let components = object.get_all_components();
    assert_eq!(components.len(), 3);
    assert!(is_transform(&components[0]));
    assert!(same_component(&components[1], &a));
    assert!(same_component(&components[2], &b));
}

#[test]
fn test_duplicate_add_is_ignored() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    let a = fixture.recorder("a").into_ref();

    object.add_component(Rc::clone(&a));
    object.add_component(Rc::clone(&a));

    assert_eq!(object.component_count(), 2);
    assert!(object.contains_component(&a));
}

#[test]
fn test_lookup_by_name() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    let first = fixture.recorder("gun").into_ref();
    let second = fixture.recorder("gun").into_ref();
    object.add_component(Rc::clone(&first));
    object.add_component(fixture.recorder("engine").into_ref());
    object.add_component(Rc::clone(&second));

    let found = object.get_component("gun").unwrap();
    assert!(same_component(&found, &first));

    let all = object.get_components_by_name("gun");
    assert_eq!(all.len(), 2);
    assert!(same_component(&all[1], &second));

    assert!(object.get_component("shield").is_none());
    assert!(object.get_components_by_name("shield").is_empty());
    assert!(object.get_component("Transform").is_some());
}

#[test]
fn test_remove_by_identity() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    let a = fixture.recorder("a").into_ref();
    let twin = fixture.recorder("a").into_ref();
    object.add_component(Rc::clone(&a));

    object.remove_component(&twin);
    assert_eq!(object.component_count(), 2);

    object.remove_component(&a);
    assert_eq!(object.component_count(), 1);
    assert!(!object.contains_component(&a));
}

#[test]
fn test_remove_keeps_remaining_order() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    let a = fixture.recorder("a").into_ref();
    let b = fixture.recorder("b").into_ref();
    object.add_component(Rc::clone(&a));
    object.add_component(Rc::clone(&b));
    object.initialize();

    object.remove_component(&a);

    let components = object.get_all_components();
    assert_eq!(components.len(), 2);
    assert!(object.is_default_component(&components[0]));
    assert!(same_component(&components[1], &b));
    fixture.manager.release_all();
}

#[test]
fn test_add_during_update_is_queued() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    let late = fixture.recorder("late").into_ref();
    let queued = Rc::clone(&late);
    object.add_component(
        fixture
            .recorder("spawner")
            .on("update", move |object| object.add_component(Rc::clone(&queued)))
            .into_ref(),
    );
    object.initialize();

    object.update(0.1);

    assert_eq!(fixture.hooks("update"), vec!["spawner"]);
    assert_eq!(object.pending_additions(), 1);
    assert!(!object.contains_component(&late));

    object.resolve_locked_tasks();
    assert_eq!(object.pending_additions(), 0);
    assert!(object.contains_component(&late));
    assert_eq!(fixture.hooks("resolve"), vec!["spawner", "late"]);

    fixture.clear_journal();
    object.update(0.1);
    assert_eq!(fixture.hooks("update"), vec!["spawner", "late"]);
    fixture.manager.release_all();
}

#[test]
fn test_remove_during_update_is_queued() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    let victim = fixture.recorder("victim").into_ref();
    let target = Rc::clone(&victim);
    object.add_component(
        fixture
            .recorder("killer")
            .on("update", move |object| object.remove_component(&target))
            .into_ref(),
    );
    object.add_component(Rc::clone(&victim));
    object.initialize();

    object.update(0.1);

    assert_eq!(fixture.hooks("update"), vec!["killer", "victim"]);
    assert_eq!(object.pending_removals(), 1);
    assert!(object.contains_component(&victim));

    object.resolve_locked_tasks();
    assert!(!object.contains_component(&victim));
    fixture.manager.release_all();
}

#[test]
fn test_queued_adds_apply_before_removes() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    let flicker = fixture.recorder("flicker").into_ref();
    let handle = Rc::clone(&flicker);
    object.add_component(
        fixture
            .recorder("a")
            .on("update", move |object| {
                object.add_component(Rc::clone(&handle));
                object.remove_component(&handle);
            })
            .into_ref(),
    );
    object.initialize();

    object.update(0.1);
    assert_eq!(object.pending_additions(), 1);
    assert_eq!(object.pending_removals(), 1);

    object.resolve_locked_tasks();
    assert!(!object.contains_component(&flicker));
    assert_eq!(object.component_count(), 2);
    fixture.manager.release_all();
}

#[test]
fn test_add_during_release_is_ignored() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    let late = fixture.recorder("late").into_ref();
    let handle = Rc::clone(&late);
    object.add_component(
        fixture
            .recorder("a")
            .on("release", move |object| object.add_component(Rc::clone(&handle)))
            .into_ref(),
    );
    object.initialize();

    object.release();

    assert_eq!(fixture.hooks("release"), vec!["a"]);
    assert_eq!(Rc::strong_count(&late), 1);
}

#[test]
fn test_transform_replacement_before_initialize() {
    let fixture = Fixture::new();
    let parent = fixture.spawn("ship");
    let object = GameObject::new_child(&fixture.services, Some(&parent), "turret");
    let grandchild = GameObject::new_child(&fixture.services, Some(&object), "barrel");
    let old = object.transform().unwrap();

    let custom = component_ref(
        Transform::new(object.id(), "Transform").with_position(Vec3::new(0.0, 2.0, 0.0)),
    );
    object.add_component(Rc::clone(&custom));

    assert!(same_component(&object.transform().unwrap(), &custom));
    assert!(same_component(&object.get_all_components()[0], &custom));
    assert!(!object.contains_component(&old));
    assert_eq!(object.component_count(), 1);
    assert!(object.is_default_component(&custom));
    assert!(!object.is_default_component(&old));

    assert_eq!(object.with_transform(Transform::parent_owner), Some(Some(parent.id())));
    assert_eq!(object.with_transform(Transform::child_owners), Some(vec![grandchild.id()]));
    assert_eq!(parent.with_transform(Transform::child_owners), Some(vec![object.id()]));
    assert_eq!(
        grandchild.with_transform(Transform::world_position),
        Some(Vec3::new(0.0, 2.0, 0.0))
    );
    fixture.manager.release_all();
}

#[test]
fn test_readding_current_transform_is_ignored() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    let transform = object.transform().unwrap();

    object.add_component(transform);

    assert_eq!(object.component_count(), 1);
}

#[test]
#[should_panic(expected = "cannot replace its transform while Initialized")]
fn test_transform_replacement_after_initialize_is_a_violation() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    object.initialize();

    object.add_component(component_ref(Transform::new(object.id(), "Transform")));
}

#[test]
fn test_component_finds_itself_inside_its_hook() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    let found = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&found);
    object.add_component(
        fixture
            .recorder("radar")
            .on("update", move |object| {
                sink.borrow_mut().push(object.get_component("radar").is_some());
                sink.borrow_mut().push(object.get_components_by_name("radar").len() == 1);
                sink.borrow_mut().push(object.get_component("other").is_some());
            })
            .into_ref(),
    );
    object.add_component(fixture.recorder("other").into_ref());
    object.initialize();

    object.update(0.1);

    assert_eq!(*found.borrow(), vec![true, true, true]);
    fixture.manager.release_all();
}
