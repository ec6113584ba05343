//! Built-in lesson content.
//!
//! Only part of the curriculum has content; lookups for the rest return `None`.

use crate::model::{Lesson, LessonRef, QuizQuestion, SubjectId};

/// Lessons of a subject, in order. May hold fewer than the subject's lesson count.
#[must_use]
pub fn lessons(subject: SubjectId) -> &'static [Lesson] {
    match subject {
        SubjectId::JavaScript => JAVASCRIPT,
        SubjectId::React => REACT,
        SubjectId::NodeJs
        | SubjectId::MongoDb
        | SubjectId::MySql
        | SubjectId::Java
        | SubjectId::Frontend => &[],
    }
}

/// Look up a lesson by 1-based number.
#[must_use]
pub fn lesson(at: LessonRef) -> Option<&'static Lesson> {
    let index = usize::from(at.number).checked_sub(1)?;
    lessons(at.subject).get(index)
}

static JAVASCRIPT: &[Lesson] = &[
    Lesson {
        title: "Variables and Data Types",
        concept: "Variables are like containers that store data values. JavaScript has different types of data like numbers, text, and true/false values.",
        explanation: "Think of variables like labeled boxes in your room. You can put different things in them and change what's inside anytime. Just like how you might have a box labeled 'books' or 'clothes', variables have names and store different types of information.",
        motivation: "Variables are like your mom's kitchen containers - you never know what's inside until you open them!",
        code_example: r#"// Creating variables (like labeling containers)
let name = "John";        // Text (string)
let age = 25;            // Number
let isStudent = true;    // True/False (boolean)

// Using variables
console.log("Hello, " + name);
console.log("You are " + age + " years old");"#,
        key_points: &[
            "Variables store data that can be used later",
            "Use 'let' to create variables that can change",
            "Use 'const' for values that never change",
            "JavaScript has different data types: strings, numbers, booleans",
        ],
        quiz: &[
            QuizQuestion::new(
                "What keyword is used to create a variable that can change?",
                &["var", "let", "const", "variable"],
                1,
            ),
            QuizQuestion::new(
                "Which data type represents true or false?",
                &["string", "number", "boolean", "text"],
                2,
            ),
            QuizQuestion::new(
                "What's the correct way to create a text variable?",
                &[
                    "let name = John",
                    "let name = \"John\"",
                    "let name = 123",
                    "let \"name\" = John",
                ],
                1,
            ),
            QuizQuestion::new(
                "Variables are like:",
                &[
                    "Permanent markers",
                    "Labeled containers",
                    "Fixed numbers",
                    "Unchangeable rules",
                ],
                1,
            ),
            QuizQuestion::new(
                "Which is a number data type?",
                &["\"25\"", "true", "25", "'twenty-five'"],
                2,
            ),
        ],
    },
    Lesson {
        title: "Functions - Your Code Helpers",
        concept: "Functions are reusable blocks of code that perform specific tasks. They're like mini-programs within your program.",
        explanation: "Functions are like recipes in a cookbook. Once you write a recipe (function), you can use it over and over again. You give it ingredients (parameters) and it gives you a dish (return value).",
        motivation: "Functions are like your best friend - always there when you need them, and they do exactly what you ask!",
        code_example: r#"// Creating a function (writing a recipe)
function greetUser(name) {
    return "Hello, " + name + "! Welcome!";
}

// Using the function (following the recipe)
let message = greetUser("Sarah");
console.log(message); // "Hello, Sarah! Welcome!"

// Another example
function addNumbers(a, b) {
    return a + b;
}

let result = addNumbers(5, 3); // result is 8"#,
        key_points: &[
            "Functions help you avoid repeating code",
            "Use 'function' keyword to create functions",
            "Parameters are inputs to functions",
            "Return statement gives back a result",
            "Call functions by using their name with ()",
        ],
        quiz: &[
            QuizQuestion::new(
                "What keyword is used to create a function?",
                &["func", "function", "def", "create"],
                1,
            ),
            QuizQuestion::new(
                "What are function inputs called?",
                &["arguments", "parameters", "inputs", "both a and b"],
                3,
            ),
            QuizQuestion::new(
                "How do you call a function named 'sayHello'?",
                &["sayHello", "sayHello()", "call sayHello", "run sayHello"],
                1,
            ),
            QuizQuestion::new(
                "Functions are like:",
                &["Recipes", "Random events", "Broken code", "Errors"],
                0,
            ),
            QuizQuestion::new(
                "What does 'return' do in a function?",
                &[
                    "Stops the function",
                    "Gives back a result",
                    "Starts over",
                    "Both a and b",
                ],
                3,
            ),
        ],
    },
    Lesson {
        title: "Control Structures - Decision Making & Loops",
        concept: "Control structures let your program make decisions and repeat tasks, giving your code the power to behave differently based on conditions.",
        explanation: "Imagine you're the boss deciding what to do next: if it rains, take an umbrella; if sunny, wear sunglasses. Loops are like your robot helpers repeating chores without complaining.",
        motivation: "Control structures are like traffic lights for your code: stop, go, or keep looping until the road is clear!",
        code_example: r#"// Decision making
const weather = "rainy";

if (weather === "rainy") {
  console.log("Take an umbrella");
} else {
  console.log("Wear sunglasses");
}

// Looping
for (let i = 1; i <= 5; i++) {
  console.log("Counting:", i);
}"#,
        key_points: &[
            "if-else helps you decide which code to run",
            "Use for and while loops to repeat actions",
            "Loops help avoid writing repetitive code",
            "Conditions must be true or false (boolean)",
        ],
        quiz: &[
            QuizQuestion::new(
                "Which keyword starts a loop?",
                &["if", "for", "else", "switch"],
                1,
            ),
            QuizQuestion::new(
                "What does if-else do?",
                &[
                    "Loops",
                    "Decides which code runs",
                    "Stores data",
                    "Calls functions",
                ],
                1,
            ),
            QuizQuestion::new(
                "What kind of values do conditions use?",
                &["Numbers", "Strings", "Booleans", "Arrays"],
                2,
            ),
            QuizQuestion::new(
                "How many times does this loop run? \nfor(let i=0; i<3; i++) {}",
                &["2", "3", "4", "Infinite"],
                1,
            ),
            QuizQuestion::new(
                "Loops are useful for:",
                &[
                    "Repeating tasks",
                    "Making decisions",
                    "Storing variables",
                    "Defining functions",
                ],
                0,
            ),
        ],
    },
    Lesson {
        title: "Objects and Arrays - Organizing Data",
        concept: "Objects group related data into named properties; arrays store ordered collections of items. They help organize and access complex data easily.",
        explanation: "Think of an object as a labeled filing cabinet with drawers for different info. Arrays are like train cars holding items in order, perfect for lists!",
        motivation: "Objects and arrays are like your Swiss Army knives: handy for everything and always ready to organize your messy data drawer!",
        code_example: r#"// Object example
const person = {
  name: "Alice",
  age: 28,
  isStudent: false,
};

// Array example
const colors = ["red", "green", "blue"];

console.log(person.name); // Alice
console.log(colors[0]); // red"#,
        key_points: &[
            "Objects store data as key-value pairs",
            "Arrays store ordered lists of items",
            "Access object properties with dot or bracket notation",
            "Access array elements by index starting at 0",
        ],
        quiz: &[
            QuizQuestion::new(
                "How do you access the first item in an array?",
                &["array[0]", "array[1]", "array.first", "array.get(0)"],
                0,
            ),
            QuizQuestion::new(
                "Objects store data as:",
                &["Values only", "Key-value pairs", "Lists", "Functions"],
                1,
            ),
            QuizQuestion::new(
                "What is the index of the first item in an array?",
                &["1", "0", "-1", "Depends on the array"],
                1,
            ),
            QuizQuestion::new(
                "How do you access a property 'name' in an object?",
                &["object.name", "object[name]", "object->name", "object:name"],
                0,
            ),
            QuizQuestion::new(
                "Arrays store:",
                &[
                    "Ordered items",
                    "Random items",
                    "Key-value pairs",
                    "Only numbers",
                ],
                0,
            ),
        ],
    },
    Lesson {
        title: "ES6 Features - Modern JavaScript",
        concept: "ES6 introduced cleaner syntax and new features like arrow functions, let/const, template literals, and destructuring to make coding easier and more fun.",
        explanation: "ES6 is like upgrading your bicycle to a motorbike: everything runs faster and smoother, with cool new tricks to show off!",
        motivation: "ES6 is like JavaScript's glow-up: cooler, faster, and way easier to hang out with!",
        code_example: r#"// Arrow function
const add = (a, b) => a + b;

// let and const
let count = 0;
const maxCount = 10;

// Template literals
const name = "Bob";
console.log(`Hello, ${name}!`);

// Destructuring
const person = { age: 30, city: "Kathmandu" };
const { age, city } = person;"#,
        key_points: &[
            "Use let and const instead of var",
            "Arrow functions provide shorter syntax",
            "Template literals allow embedding variables easily",
            "Destructuring extracts data from objects or arrays",
        ],
        quiz: &[
            QuizQuestion::new(
                "How do you write an arrow function?",
                &["function () => {}", "() => {}", "func => {}", "() => []"],
                1,
            ),
            QuizQuestion::new(
                "What does template literal use?",
                &[
                    "'' (single quotes)",
                    "\"\" (double quotes)",
                    "`` (backticks)",
                    "{} (braces)",
                ],
                2,
            ),
            QuizQuestion::new(
                "Which keywords replace 'var' in ES6?",
                &[
                    "let and const",
                    "var only",
                    "function and const",
                    "var and let",
                ],
                0,
            ),
            QuizQuestion::new(
                "Destructuring is used to:",
                &[
                    "Extract data from arrays or objects",
                    "Create new variables",
                    "Call functions",
                    "Loop over arrays",
                ],
                0,
            ),
            QuizQuestion::new(
                "Arrow functions have:",
                &[
                    "A shorter syntax",
                    "No return value",
                    "Require the function keyword",
                    "Can't have parameters",
                ],
                0,
            ),
        ],
    },
];

static REACT: &[Lesson] = &[Lesson {
    title: "Components - Building Blocks",
    concept: "React components are like LEGO blocks. Each component is a piece of your website that you can reuse and combine to build bigger things.",
    explanation: "Imagine building with LEGO blocks. Each block has a specific purpose and you can combine them to create amazing structures. React components work the same way - each component is a reusable piece of your website.",
    motivation: "Components are like LEGO blocks - once you start building, you can't stop!",
    code_example: r#"// Creating a component (making a LEGO block)
function WelcomeMessage() {
    return <h1>Welcome to our awesome website!</h1>;
}

// Using the component (placing the LEGO block)
function App() {
    return (
        <div>
            <WelcomeMessage />
            <WelcomeMessage />
        </div>
    );
}"#,
    key_points: &[
        "Components are reusable pieces of UI",
        "Start component names with capital letters",
        "Components return JSX (HTML-like code)",
        "You can use components multiple times",
        "Components make code organized and manageable",
    ],
    quiz: &[
        QuizQuestion::new(
            "What should component names start with?",
            &["lowercase letter", "number", "capital letter", "underscore"],
            2,
        ),
        QuizQuestion::new(
            "Components are like:",
            &["LEGO blocks", "Broken toys", "Random code", "Errors"],
            0,
        ),
        QuizQuestion::new(
            "What do components return?",
            &["Numbers", "JSX", "Errors", "Nothing"],
            1,
        ),
        QuizQuestion::new(
            "Can you use a component multiple times?",
            &["No, never", "Yes, always", "Sometimes", "Only on weekends"],
            1,
        ),
        QuizQuestion::new(
            "Which is a correct component?",
            &[
                "function hello()",
                "function Hello()",
                "Hello function()",
                "hello Function()",
            ],
            1,
        ),
    ],
}];
