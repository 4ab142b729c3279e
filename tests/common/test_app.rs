use bevy::prelude::*;
use race_pilot::{
    components::{
        ArcadeBodyConfig, PathFollowerConfig, RacePath, RouteConfig, SpatialComponent,
    },
    plugins::{path_follower_bundle, RacePilotPlugin},
    resources::SimulationConfig,
};

/// Racer spawned onto the builder's route
pub struct RacerSpec {
    pub pilot: PathFollowerConfig,
    pub body: ArcadeBodyConfig,
    pub spatial: SpatialComponent,
}

// Builder for creating a test application with customizable configuration
pub struct TestAppBuilder {
    simulation: SimulationConfig,
    route: Option<RouteConfig>,
    racers: Vec<RacerSpec>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            route: None,
            racers: Vec::new(),
        }
    }
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.simulation.time_step = time_step;
        self
    }

    pub fn with_route(mut self, route: RouteConfig) -> Self {
        self.route = Some(route);
        self
    }

    /// Adds a path-following racer. Requires a route.
    pub fn with_racer(mut self, racer: RacerSpec) -> Self {
        self.racers.push(racer);
        self
    }

    pub fn build(self) -> TestApp {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(RacePilotPlugin::new(self.simulation));

        let world = app.world_mut();
        let path = self
            .route
            .map(|route| world.spawn(RacePath::from_config(&route)).id());

        let mut racers = Vec::new();
        for racer in self.racers {
            let path = path.expect("racers need a route");
            let entity = world
                .spawn(path_follower_bundle(path, racer.pilot, racer.body, racer.spatial))
                .id();
            racers.push(entity);
        }

        TestApp { app, path, racers }
    }
}

/// Main test application wrapper
pub struct TestApp {
    pub app: App,
    pub path: Option<Entity>,
    pub racers: Vec<Entity>,
}

impl TestApp {
    /// Runs the fixed-step schedule directly, independent of wall-clock time.
    pub fn run_steps(&mut self, steps: usize) {
        for _ in 0..steps {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.app.world().get::<T>(entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<Mut<T>> {
        self.app.world_mut().get_mut::<T>(entity)
    }

    pub fn racer(&self, index: usize) -> Entity {
        self.racers[index]
    }

    pub fn path(&self) -> Entity {
        self.path.expect("no route spawned")
    }
}
