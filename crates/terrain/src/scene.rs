use bevy::prelude::*;
use std::collections::HashMap;

/// Named objects this app has put into the world.
///
/// Spawning under a name that is already taken despawns the previous entity,
/// so at most one live object exists per name.
#[derive(Resource, Default, Debug)]
pub struct SceneObjects {
    entities: HashMap<String, Entity>,
}

impl SceneObjects {
    pub fn get(&self, name: &str) -> Option<Entity> {
        self.entities.get(name).copied()
    }

    /// Registers `entity` under `name`, despawning and returning any stale one.
    pub fn replace(&mut self, commands: &mut Commands, name: &str, entity: Entity) -> Option<Entity> {
        let stale = self.entities.insert(name.to_string(), entity)?;
        if stale == entity {
            return None;
        }
        commands.entity(stale).despawn();
        info!("replaced stale scene object '{name}' ({stale})");
        Some(stale)
    }

    pub fn remove(&mut self, commands: &mut Commands, name: &str) -> Option<Entity> {
        let entity = self.entities.remove(name)?;
        commands.entity(entity).despawn();
        Some(entity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[derive(Component)]
    struct Marker(u32);

    fn spawn_named(world: &mut World, name: &'static str, tag: u32) -> Option<Entity> {
        world
            .run_system_once(
                move |mut commands: Commands, mut objects: ResMut<SceneObjects>| {
                    let entity = commands.spawn(Marker(tag)).id();
                    objects.replace(&mut commands, name, entity)
                },
            )
            .unwrap()
    }

    #[test]
    fn replace_despawns_stale_object() {
        let mut world = World::new();
        world.init_resource::<SceneObjects>();

        assert_eq!(spawn_named(&mut world, "Terrain", 1), None);
        let stale = world.resource::<SceneObjects>().get("Terrain").unwrap();

        assert_eq!(spawn_named(&mut world, "Terrain", 2), Some(stale));
        assert!(world.get_entity(stale).is_err());

        let objects = world.resource::<SceneObjects>();
        assert_eq!(objects.len(), 1);
        let live = objects.get("Terrain").unwrap();
        assert_eq!(world.get::<Marker>(live).map(|m| m.0), Some(2));
    }

    #[test]
    fn names_are_independent() {
        let mut world = World::new();
        world.init_resource::<SceneObjects>();

        spawn_named(&mut world, "Terrain", 1);
        spawn_named(&mut world, "Water", 2);
        assert_eq!(world.resource::<SceneObjects>().len(), 2);
    }

    #[test]
    fn remove_despawns() {
        let mut world = World::new();
        world.init_resource::<SceneObjects>();
        spawn_named(&mut world, "Terrain", 1);

        let removed = world
            .run_system_once(|mut commands: Commands, mut objects: ResMut<SceneObjects>| {
                objects.remove(&mut commands, "Terrain")
            })
            .unwrap()
            .unwrap();

        assert!(world.get_entity(removed).is_err());
        assert!(world.resource::<SceneObjects>().is_empty());
    }
}
