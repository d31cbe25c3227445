//! Traits with default methods, trait objects and a generic repository.

use std::any::type_name;

use rust_decimal::Decimal;

/// Shared behaviour for anything that drives. Implementors supply the state
/// accessors and their speed limit; starting, stopping and accelerating come
/// for free.
pub trait Vehicle {
    fn brand(&self) -> &str;
    fn kind(&self) -> &'static str;
    fn max_speed(&self) -> u32;
    fn speed(&self) -> u32;
    fn set_speed(&mut self, speed: u32);

    fn start(&self) -> String {
        format!("{} engine started", self.brand())
    }

    fn accelerate(&mut self, speed: u32) -> String {
        self.set_speed(speed.min(self.max_speed()));
        format!("{} {} accelerating to {} km/h", self.brand(), self.kind(), self.speed())
    }

    fn stop(&mut self) -> String {
        self.set_speed(0);
        format!("{} stopped", self.brand())
    }
}

pub struct Car {
    brand: String,
    capacity: u32,
    speed: u32,
}

impl Car {
    pub fn new(brand: &str, capacity: u32) -> Self {
        Self { brand: brand.to_owned(), capacity, speed: 0 }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn open_trunk(&self) -> &'static str {
        "Trunk opened"
    }
}

impl Vehicle for Car {
    fn brand(&self) -> &str { &self.brand }
    fn kind(&self) -> &'static str { "car" }
    fn max_speed(&self) -> u32 { 200 }
    fn speed(&self) -> u32 { self.speed }
    fn set_speed(&mut self, speed: u32) { self.speed = speed; }
}

pub struct Motorcycle {
    brand: String,
    speed: u32,
}

impl Motorcycle {
    pub fn new(brand: &str) -> Self {
        Self { brand: brand.to_owned(), speed: 0 }
    }
}

impl Vehicle for Motorcycle {
    fn brand(&self) -> &str { &self.brand }
    fn kind(&self) -> &'static str { "motorcycle" }
    fn max_speed(&self) -> u32 { 300 }
    fn speed(&self) -> u32 { self.speed }
    fn set_speed(&mut self, speed: u32) { self.speed = speed; }
}

// ── Repository ────────────────────────────────────────────────────────────────

/// In-memory store handing out ids starting at 1.
pub struct Repository<T> {
    items: Vec<(u32, T)>,
    next_id: u32,
}

impl<T> Default for Repository<T> {
    fn default() -> Self {
        Self { items: Vec::new(), next_id: 1 }
    }
}

impl<T> Repository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `item` and returns its id.
    pub fn add(&mut self, item: T) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push((id, item));
        id
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.items.iter().find(|(i, _)| *i == id).map(|(_, item)| item)
    }

    pub fn all(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|(_, item)| item)
    }

    /// Removes the item, returning it if it existed.
    pub fn delete(&mut self, id: u32) -> Option<T> {
        let index = self.items.iter().position(|(i, _)| *i == id)?;
        Some(self.items.remove(index).1)
    }

    /// Short name of the stored type, for log lines.
    pub fn item_kind(&self) -> &'static str {
        let full = type_name::<T>();
        full.rsplit("::").next().unwrap_or(full)
    }
}

pub struct Product {
    pub name: String,
    pub price: Decimal,
}

impl Product {
    pub fn new(name: &str, price: Decimal) -> Self {
        Self { name: name.to_owned(), price }
    }
}

pub fn lines() -> Vec<String> {
    let mut out = Vec::new();

    let mut vehicles: Vec<Box<dyn Vehicle>> = vec![
        Box::new(Car::new("Tesla", 5)),
        Box::new(Motorcycle::new("Harley Davidson")),
    ];
    for vehicle in &mut vehicles {
        out.push(vehicle.start());
        out.push(vehicle.accelerate(100));
        out.push(vehicle.stop());
    }

    // Car-only behaviour needs the concrete type, not the trait object.
    let car = Car::new("Tesla", 5);
    out.push(format!("{} seats {} passengers", car.brand(), car.capacity()));
    out.push(car.open_trunk().to_owned());

    let mut products = Repository::new();
    for product in [
        Product::new("Laptop", Decimal::new(99_999, 2)),
        Product::new("Mouse", Decimal::new(2_999, 2)),
    ] {
        products.add(product);
        out.push(format!("Added {}", products.item_kind()));
    }
    for product in products.all() {
        out.push(format!("Product: {} - ${}", product.name, product.price));
    }
    out
}
