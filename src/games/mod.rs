pub mod digits;

pub struct GameDescriptor
{
    pub name: &'static str,
    pub description: &'static str,
}

pub fn registry() -> Vec<GameDescriptor>
{
    vec![GameDescriptor {
        name: "digits",
        description: "Crack a 2-6 digit code, scored by digits in the right place",
    },
    GameDescriptor {
        name: "fourdle",
        description: "Classic four-digit number guessing",
    }]
}
