use crate::questionnaire::{QUESTIONS, RESPONSE_OPTIONS};

pub fn run() -> Result<(), String> {
    for (index, question) in QUESTIONS.iter().enumerate() {
        println!("{:>2}. {question}", index + 1);
    }
    println!();
    let scale = RESPONSE_OPTIONS
        .iter()
        .enumerate()
        .map(|(index, option)| format!("{}={option}", index + 1))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Answers: {scale}");
    Ok(())
}
