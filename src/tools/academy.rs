//! Training academy course schedule.

pub fn get_academy_schedule(course_type: &str) -> String {
    let needle = course_type.to_lowercase();

    if needle.contains("basic") {
        "The next 1-Day Basic Beekeeping course is on March 15th. It costs ₹1,500.".to_string()
    } else if needle.contains("commercial") {
        "The next 3-Month Commercial Apiculture training starts on April 1st. It costs ₹15,000."
            .to_string()
    } else {
        "Please specify if you are interested in Basic Beekeeping or Commercial Apiculture."
            .to_string()
    }
}
