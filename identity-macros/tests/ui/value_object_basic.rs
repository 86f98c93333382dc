use identity_domain::value_object::value_object;

#[value_object]
struct Label {
    text: String,
}

#[value_object(debug = false)]
struct Opaque(i32);

#[value_object]
enum Level {
    #[default]
    Low,
    High,
}

fn main() {
    let _ = format!("{:?}", Label { text: "x".into() });

    let a = Label::default();
    let _eq = a.clone() == Label { text: String::new() };

    let _ = Opaque(1);

    let level: Level = Default::default();
    let _ = level != Level::High;
}
