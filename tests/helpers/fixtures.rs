//! Common PHP sources for tests.

use classmover::SourceReflector;
use once_cell::sync::Lazy;

// Inheritance
pub const SUBCLASS_CALL: &str =
    "<?php class A { public function foo(){} } class B extends A {} $b = new B(); $b->foo();";

pub const STATIC_CALL: &str = "<?php Foo::bar();";

pub const UNRELATED_SAVES: &str = r#"<?php
class Post { public function save() {} }
class Comment { public function save() {} }
function persist(Post $post, Comment $comment, $unknown) {
    $post->save();
    $comment->save();
    $unknown->save();
}
"#;

// Member kinds
pub const JOB: &str = r#"<?php
class Job {
    public $handler;
    const QUEUE = 'default';
    public function run() {
        $this->handler;
        $this->handler();
        self::QUEUE;
    }
}
"#;

pub const STATUS: &str = r#"<?php
class Status { const ACTIVE = 1; }
enum Suit { case Hearts; case Spades; }
$status = Status::ACTIVE;
$suit = Suit::Hearts;
$name = Status::class;
"#;

// Interfaces
pub const RUNNABLE: &str = r#"<?php
interface Runnable { public function run(); }
abstract class Task implements Runnable {}
class Other { public function run() {} }
$task = new Task();
$task->run();
"#;

// Namespaces
pub const MODELS: &str = r#"<?php
namespace App\Models;

class Model {
    public static function find($id) {}
}

class Post extends Model {
    public function publish() {}
}
"#;

pub const CONTROLLER: &str = r#"<?php
namespace App\Http;

use App\Models\Post;

class PostController {
    public function update(Post $post) {
        $post->publish();
        Post::find(1);
    }
}
"#;

/// Reflector over [`MODELS`], shared between tests
pub static MODELS_REFLECTOR: Lazy<SourceReflector> = Lazy::new(|| {
    let mut reflector = SourceReflector::new();
    reflector.add_source(MODELS);
    reflector
});
