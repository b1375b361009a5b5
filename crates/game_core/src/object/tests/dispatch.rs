use super::*;
use std::cell::Cell;

fn two_recorders(fixture: &Fixture) -> GameObjectRef {
    let object = fixture.spawn("ship");
    object.add_component(fixture.recorder("a").into_ref());
    object.add_component(fixture.recorder("b").into_ref());
    object
}

#[test]
fn test_frame_hooks_follow_sequence_order() {
    let fixture = Fixture::new();
    let object = two_recorders(&fixture);
    object.initialize();

    object.update_physics(0.1);
    object.update(0.1);
    object.render();

    assert_eq!(fixture.hooks("physics"), vec!["a", "b"]);
    assert_eq!(fixture.hooks("update"), vec!["a", "b"]);
    assert_eq!(fixture.hooks("render"), vec!["a", "b"]);
    fixture.manager.release_all();
}

#[test]
fn test_uninitialized_object_dispatches_nothing() {
    let fixture = Fixture::new();
    let object = two_recorders(&fixture);

    object.update_physics(0.1);
    object.update(0.1);
    object.render();
    object.on_collision_enter(&CollisionInfo::trigger(ObjectId::new(5)));

    assert!(fixture.journal.borrow().is_empty());
}

#[test]
fn test_inactive_object_only_renders() {
    let fixture = Fixture::new();
    let object = two_recorders(&fixture);
    object.initialize();
    object.set_active(false);
    fixture.clear_journal();

    object.update_physics(0.1);
    object.update(0.1);
    object.render();
    for event in CollisionEvent::ALL {
        object.dispatch_collision(event, &CollisionInfo::trigger(ObjectId::new(5)));
    }

    let journal = fixture.journal.borrow().clone();
    assert_eq!(journal, vec!["a:render", "b:render"]);
    fixture.manager.release_all();
}

#[test]
fn test_collision_events_reach_matching_hooks() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    object.add_component(fixture.recorder("a").into_ref());
    object.initialize();
    fixture.clear_journal();
    let info = CollisionInfo::new(ObjectId::new(3), crate::foundation::math::Vec3::y(), 0.25);

    object.on_collision_enter(&info);
    object.on_collision_stay(&info);
    object.on_collision_exit(&info);
    object.on_trigger_enter(&info);
    object.on_trigger_stay(&info);
    object.on_trigger_exit(&info);

    let journal = fixture.journal.borrow().clone();
    assert_eq!(
        journal,
        vec![
            "a:collision_enter",
            "a:collision_stay",
            "a:collision_exit",
            "a:trigger_enter",
            "a:trigger_stay",
            "a:trigger_exit",
        ]
    );
    fixture.manager.release_all();
}

#[test]
fn test_manager_routes_collisions() {
    let fixture = Fixture::new();
    let object = two_recorders(&fixture);
    object.initialize();

    let info = CollisionInfo::trigger(ObjectId::new(42));
    assert!(fixture
        .manager
        .dispatch_collision(object.id(), CollisionEvent::TriggerStay, &info));

    assert_eq!(fixture.hooks("trigger_stay"), vec!["a", "b"]);
    fixture.manager.release_all();
}

#[test]
fn test_object_is_locked_inside_hooks() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    let locked = Rc::new(Cell::new(false));
    let probe = Rc::clone(&locked);
    object.add_component(
        fixture
            .recorder("a")
            .on("update", move |object| probe.set(object.is_locked()))
            .into_ref(),
    );
    object.initialize();

    object.update(0.1);

    assert!(locked.get());
    assert!(!object.is_locked());
    fixture.manager.release_all();
}

#[test]
fn test_nested_dispatch_keeps_outer_lock() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    let late = fixture.recorder("late").into_ref();
    let queued = Rc::clone(&late);
    object.add_component(
        fixture
            .recorder("a")
            .on("update", move |object| {
                object.on_trigger_enter(&CollisionInfo::trigger(ObjectId::new(1)));
                object.add_component(Rc::clone(&queued));
            })
            .into_ref(),
    );
    object.add_component(fixture.recorder("b").into_ref());
    object.initialize();

    object.update(0.1);

    assert_eq!(fixture.hooks("trigger_enter"), vec!["b"]);
    assert_eq!(object.pending_additions(), 1);
    assert!(!object.contains_component(&late));
    fixture.manager.release_all();
}

#[test]
fn test_resolve_reaches_components() {
    let fixture = Fixture::new();
    let object = two_recorders(&fixture);
    object.initialize();

    object.resolve_locked_tasks();

    assert_eq!(fixture.hooks("resolve"), vec!["a", "b"]);
    fixture.manager.release_all();
}

#[test]
fn test_manager_runs_each_phase_across_all_objects() {
    let fixture = Fixture::new();
    let first = fixture.spawn("first");
    first.add_component(fixture.recorder("x").into_ref());
    let second = fixture.spawn("second");
    second.add_component(fixture.recorder("y").into_ref());

    fixture.manager.run_frame(0.1);

    let journal = fixture.journal.borrow().clone();
    assert_eq!(
        journal,
        vec![
            "x:initialize",
            "x:resolve",
            "y:initialize",
            "y:resolve",
            "x:physics",
            "y:physics",
            "x:update",
            "y:update",
            "x:render",
            "y:render",
        ]
    );
    fixture.manager.release_all();
}

#[test]
fn test_messages_are_delivered_by_the_frame() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    let received = Rc::new(Cell::new(0.0_f32));
    let sink = Rc::clone(&received);
    object.with_messenger(|messenger| {
        messenger.subscribe("damage", move |message: &Message| {
            sink.set(message.float_arg("amount").unwrap_or_default());
            true
        })
    });
    object.add_component(
        fixture
            .recorder("gun")
            .on("update", |object| {
                object.with_messenger(|messenger| {
                    messenger.send(Message::new("damage", 0.0).with_arg("amount", MessageArg::Float(7.5)));
                });
            })
            .into_ref(),
    );

    fixture.manager.run_frame(0.1);
    assert!(received.get().abs() < f32::EPSILON);

    fixture.manager.run_frame(0.1);
    assert!((received.get() - 7.5).abs() < f32::EPSILON);
    fixture.manager.release_all();
}

#[test]
fn test_handler_may_release_its_object() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    object.add_component(fixture.recorder("hull").into_ref());
    let weak = Rc::downgrade(&object);
    object.with_messenger(|messenger| {
        messenger.subscribe("die", move |_message: &Message| {
            if let Some(object) = weak.upgrade() {
                object.release();
            }
            true
        })
    });
    object.with_messenger(|messenger| messenger.send(Message::new("die", 0.0)));

    fixture.manager.run_frame(0.1);

    assert!(object.is_released());
    assert!(object.with_messenger(|messenger| messenger.pending()).is_none());
    assert_eq!(fixture.manager.object_count(), 0);
    assert_eq!(fixture.hooks("update"), Vec::<String>::new());
}

#[test]
fn test_handler_may_message_its_object() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    let pongs = Rc::new(Cell::new(0));
    let counter = Rc::clone(&pongs);
    let weak = Rc::downgrade(&object);
    object.with_messenger(|messenger| {
        messenger.subscribe("ping", move |_message: &Message| {
            if let Some(object) = weak.upgrade() {
                object.with_messenger(|messenger| messenger.send(Message::new("pong", 0.0)));
            }
            true
        });
        messenger.subscribe("pong", move |_message: &Message| {
            counter.set(counter.get() + 1);
            true
        });
        messenger.send(Message::new("ping", 0.0));
    });

    fixture.manager.run_frame(0.1);
    assert_eq!(pongs.get(), 0);
    assert_eq!(object.with_messenger(|messenger| messenger.pending()), Some(1));

    fixture.manager.run_frame(0.1);
    assert_eq!(pongs.get(), 1);
    assert_eq!(object.with_messenger(|messenger| messenger.pending()), Some(0));
    fixture.manager.release_all();
}

#[test]
fn test_subscription_made_during_delivery_survives() {
    let fixture = Fixture::new();
    let object = fixture.spawn("ship");
    let weak = Rc::downgrade(&object);
    object.with_messenger(|messenger| {
        messenger.subscribe("arm", move |_message: &Message| {
            if let Some(object) = weak.upgrade() {
                object.with_messenger(|messenger| messenger.subscribe("fire", |_message: &Message| true));
            }
            true
        });
        messenger.send(Message::new("arm", 0.0));
    });

    fixture.manager.run_frame(0.1);

    assert_eq!(object.with_messenger(|messenger| messenger.subscription_count()), Some(2));
    fixture.manager.release_all();
}
