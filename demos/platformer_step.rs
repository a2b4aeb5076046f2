use glam::Vec2;
use tilebonk::*;

const LIBRARY: &str = r#"{
    "definitions": [
        { "id": "ground", "spriteRef": "ground.png",
          "collisionBox": { "x": 0, "y": 0, "width": 32, "height": 32 },
          "collisionSides": ["Top", "Bottom", "Left", "Right"] },
        { "id": "spikes", "spriteRef": "spikes.png",
          "collisionBox": { "x": 0, "y": 16, "width": 32, "height": 16 },
          "collisionSides": ["Top"], "damage": 1 }
    ]
}"#;

const MAP: &str = r#"{
    "width": 16, "height": 8,
    "placements": [
        { "x": 0, "y": 7, "tileDefinitionId": "ground" },
        { "x": 1, "y": 7, "tileDefinitionId": "ground" },
        { "x": 2, "y": 7, "tileDefinitionId": "ground" },
        { "x": 3, "y": 7, "tileDefinitionId": "ground" },
        { "x": 4, "y": 7, "tileDefinitionId": "spikes" },
        { "x": 5, "y": 6, "tileDefinitionId": "ground" },
        { "x": 5, "y": 7, "tileDefinitionId": "ground" }
    ]
}"#;

struct Player {
    position: Vec2,
    velocity: Vec2,
    health: f32,
    grounded: bool,
}

impl Collidable for Player {
    fn position(&self) -> Vec2 { self.position }
    fn set_position(&mut self, position: Vec2) { self.position = position; }
    fn velocity(&self) -> Vec2 { self.velocity }
    fn set_velocity(&mut self, velocity: Vec2) { self.velocity = velocity; }
    fn collision_box(&self) -> Rect { Rect::new(2.0, 0.0, 12.0, 24.0) }
    fn can_take_damage(&self) -> bool { true }

    fn on_collision(&mut self, event: &CollisionEvent<'_>) {
        self.position = event.suggested_position;
        self.velocity = event.suggested_velocity;
        if event.sides.contains(Side::Bottom) {
            self.grounded = true;
        }
    }

    fn take_damage(&mut self, amount: f32) {
        self.health -= amount;
    }
}

fn main() {
    let grid = match load_level(LIBRARY, MAP, GridConfig::default()) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("failed to load level: {e}");
            return;
        }
    };
    println!("{:?}", grid.debug_stats());

    let dt = 1.0 / 60.0;
    let gravity = 900.0;
    let mut player = Player { position: Vec2::new(20.0, 100.0), velocity: Vec2::new(90.0, 0.0), health: 3.0, grounded: false };

    // Run right into the raised block, then back left across the ground seams.
    for step in 0..270 {
        let run = if step < 180 { 90.0 } else { -90.0 };
        player.velocity.x = run;
        player.grounded = false;
        player.velocity.y += gravity * dt;
        player.position += player.velocity * dt;
        grid.check_collision(&mut player);
        if step % 15 == 0 {
            println!(
                "step={:3} pos=({:7.2},{:7.2}) vel=({:7.2},{:7.2}) grounded={} health={}",
                step, player.position.x, player.position.y, player.velocity.x, player.velocity.y, player.grounded, player.health
            );
        }
    }
}
